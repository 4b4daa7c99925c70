//! Event payloads and the timestamped record wrapper.

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::Serialize;

// Layer 3: Internal module imports
use crate::actor::ActorRef;
use crate::message::{Msg, NodeAddr};

/// A message that could not be delivered, together with the destination it
/// was aimed at. The ref carries whatever addressing was known at the
/// point of failure (an unbound `(path, node)` for remote drops, a bare
/// path for unregistered inbound traffic).
#[derive(Debug, Clone, Serialize)]
pub struct DeadLetter {
    pub target: ActorRef,
    pub message: Msg,
}

/// Events emitted by the runtime.
#[derive(Debug, Clone, Serialize)]
pub enum Event {
    /// A message was dropped; see [`DeadLetter`].
    DeadLetter(DeadLetter),
    /// The first frame from an unknown peer was not a `ping`. Tolerated
    /// (the frame is processed as if preceded by one) but worth flagging.
    ProtocolViolation { peer: NodeAddr },
}

/// An [`Event`] stamped with its wall-clock emission time.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,
    pub event: Event,
}

impl EventRecord {
    pub fn now(event: Event) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }

    /// The dead letter inside this record, if it is one.
    pub fn as_dead_letter(&self) -> Option<&DeadLetter> {
        match &self.event {
            Event::DeadLetter(dl) => Some(dl),
            Event::ProtocolViolation { .. } => None,
        }
    }
}
