//! Wire framing: heartbeat literals and the payload codec.
//!
//! Every frame is either the literal ASCII `ping`/`pong` or an encoded
//! `(path, msg)` tuple. Frames are discrete messages; the transport is
//! message-oriented, so no length prefix is needed at this layer.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use bytes::Bytes;

// Layer 3: Internal module imports
use super::error::WireError;
use crate::message::{ActorPath, Msg};

/// Heartbeat request: answered with a pong.
pub const PING: &[u8] = b"ping";

/// Heartbeat answer; also sent to fresh peers on the tick.
pub const PONG: &[u8] = b"pong";

/// A liveness signal. Receiving either updates the peer's freshness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heartbeat {
    Ping,
    Pong,
}

impl Heartbeat {
    pub fn payload(self) -> Bytes {
        match self {
            Heartbeat::Ping => Bytes::from_static(PING),
            Heartbeat::Pong => Bytes::from_static(PONG),
        }
    }
}

impl fmt::Display for Heartbeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Heartbeat::Ping => "ping",
            Heartbeat::Pong => "pong",
        })
    }
}

/// Classify a frame as a heartbeat, if it is one.
pub fn heartbeat(data: &[u8]) -> Option<Heartbeat> {
    if data == PING {
        Some(Heartbeat::Ping)
    } else if data == PONG {
        Some(Heartbeat::Pong)
    } else {
        None
    }
}

/// Encode a `(path, msg)` payload frame.
pub fn encode(path: &ActorPath, msg: &Msg) -> Result<Bytes, WireError> {
    serde_json::to_vec(&(path, msg))
        .map(Bytes::from)
        .map_err(WireError::Encode)
}

/// Decode a payload frame back into `(path, msg)`. Any refs inside come
/// out unbound; the hub rewrites them after decoding.
pub fn decode(data: &[u8]) -> Result<(ActorPath, Msg), WireError> {
    serde_json::from_slice(data).map_err(WireError::Decode)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests are allowed to use unwrap for simplicity
mod tests {
    use super::*;

    #[test]
    fn test_heartbeat_classification() {
        assert_eq!(heartbeat(b"ping"), Some(Heartbeat::Ping));
        assert_eq!(heartbeat(b"pong"), Some(Heartbeat::Pong));
        assert_eq!(heartbeat(b"pingg"), None);
        assert_eq!(heartbeat(b""), None);
    }

    #[test]
    fn test_frame_roundtrip() {
        let path = ActorPath::from("/actor");
        let msg = Msg::tuple([Msg::from("chunk"), Msg::Bytes(vec![0, 255])]);
        let bytes = encode(&path, &msg).unwrap();
        let (decoded_path, decoded_msg) = decode(&bytes).unwrap();
        assert_eq!(decoded_path, path);
        assert_eq!(decoded_msg, msg);
    }

    #[test]
    fn test_payload_is_never_mistaken_for_heartbeat() {
        let bytes = encode(&"/p".into(), &Msg::from("ping")).unwrap();
        assert_eq!(heartbeat(&bytes), None);
    }

    #[test]
    fn test_decode_failure() {
        assert!(decode(b"{not json").is_err());
    }
}
