//! Lifecycle states and exit reasons.

// Layer 3: Internal module imports
use crate::message::{Fault, Msg};

use super::reference::ActorRef;

/// Tag of the synthetic supervision message delivered to a parent when a
/// child terminates: `("exit", child_ref, reason)`.
pub const EXIT: &str = "exit";

/// Lifecycle state of an actor cell.
///
/// `Stopped` is terminal: an actor never leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    NotStarted,
    Running,
    Paused,
    Stopped,
}

impl ActorState {
    /// Alive means "has not terminated yet"; a not-yet-started actor counts.
    pub fn is_alive(self) -> bool {
        self != ActorState::Stopped
    }
}

/// Why an actor terminated.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitReason {
    /// The body returned, possibly with a value.
    Normal(Option<Msg>),
    /// The body failed.
    Failed(Fault),
    /// The actor was stopped from the outside.
    Stopped,
}

impl ExitReason {
    /// The reason as it appears in the third slot of an exit message.
    pub fn to_msg(&self) -> Msg {
        match self {
            ExitReason::Normal(Some(value)) => value.clone(),
            ExitReason::Normal(None) => Msg::Nil,
            ExitReason::Failed(fault) => Msg::Fault(fault.clone()),
            ExitReason::Stopped => Msg::Stopped,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExitReason::Failed(_))
    }
}

/// Build the `("exit", child, reason)` supervision message.
pub(crate) fn exit_msg(child: ActorRef, reason: &ExitReason) -> Msg {
    Msg::tuple([Msg::from(EXIT), Msg::Ref(child), reason.to_msg()])
}
