//! Per-peer liveness state.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::fmt;

// Layer 2: Third-party crate imports
use serde::Serialize;
use tokio::time::Instant;

// Layer 3: Internal module imports
use crate::message::{ActorPath, Msg, NodeAddr};

/// Liveness state of a known peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeerState {
    /// We have sent to this peer and not heard back yet.
    RadioSilence,
    /// The peer pinged us but we have seen no pong or payload since.
    ReverseRadioSilence,
    /// Fresh in both directions; messages are transmitted immediately.
    Visible,
    /// Given up queueing for this peer; still probing with pings.
    SilentlyHoping,
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PeerState::RadioSilence => "radiosilence",
            PeerState::ReverseRadioSilence => "reverse-radiosilence",
            PeerState::Visible => "visible",
            PeerState::SilentlyHoping => "silentlyhoping",
        })
    }
}

/// An outbound message waiting for its peer to become reachable.
#[derive(Debug, Clone)]
pub(crate) struct PendingMsg {
    pub path: ActorPath,
    pub node: NodeAddr,
    pub msg: Msg,
}

/// Book-keeping for one known peer. Never removed for the life of the hub.
pub(crate) struct PeerConn {
    pub state: PeerState,
    pub last_seen: Instant,
    /// `None` means queueing has been abandoned: subsequent sends go
    /// straight to dead letters.
    pub queue: Option<VecDeque<(PendingMsg, Instant)>>,
}

impl PeerConn {
    pub fn new(state: PeerState, last_seen: Instant) -> Self {
        Self {
            state,
            last_seen,
            queue: Some(VecDeque::new()),
        }
    }

    pub fn queued(&self) -> Option<usize> {
        self.queue.as_ref().map(VecDeque::len)
    }
}

/// Point-in-time view of a peer for tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerSnapshot {
    pub state: PeerState,
    /// Queue depth, or `None` once queueing has been abandoned.
    pub queued: Option<usize>,
}
