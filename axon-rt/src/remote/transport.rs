//! Transport seams between the hub and the wire.
//!
//! The hub assumes a datagram-style, message-oriented transport: discrete
//! frames, unreliable delivery, per-`(src, dst)` ordering while the link
//! is up. A router/dealer socket pair satisfies this, and so does the mock
//! network in [`crate::testkit`].

// Layer 2: Third-party crate imports
use bytes::Bytes;

// Layer 3: Internal module imports
use super::error::TransportError;
use crate::message::NodeAddr;

/// A transport endpoint declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Listen on this address. An incoming transport binds exactly once,
    /// to its own node address.
    Bind(NodeAddr),
    /// Open an outgoing lane to this address.
    Connect(NodeAddr),
}

/// Callback installed on the incoming transport: `(source, frame)`.
pub type InboundHandler = Box<dyn Fn(NodeAddr, Bytes) + Send + Sync>;

/// The hub's outgoing side: connect-type endpoints plus frame sends.
pub trait OutgoingTransport: Send + Sync + 'static {
    fn add_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<(), TransportError>;

    /// Send one frame to a previously connected address.
    fn send_msg(&self, dst: &NodeAddr, payload: Bytes) -> Result<(), TransportError>;
}

/// The hub's incoming side: one bind-type endpoint plus a message callback.
pub trait IncomingTransport: Send + Sync + 'static {
    fn add_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<(), TransportError>;

    /// Install the frame callback. Must be called before any frame can
    /// arrive; the hub does so during construction.
    fn set_message_handler(&self, handler: InboundHandler);
}
