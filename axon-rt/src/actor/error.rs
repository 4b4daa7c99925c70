//! Actor lifecycle and body error types.

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::mailbox::MailboxError;
use crate::message::Fault;

/// The signal injected into a body when its actor is being stopped.
///
/// Context operations fail with this once `stop` has been requested; a
/// well-behaved body lets it propagate (or cleans up and returns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("actor received a stop signal")]
pub struct StopSignal;

/// Lifecycle misuse and routing errors surfaced on [`super::ActorHandle`].
#[derive(Debug, Error)]
pub enum ActorError {
    #[error("actor has not been started")]
    NotStarted,

    #[error("actor is already running")]
    AlreadyRunning,

    #[error("actor is not running")]
    NotRunning,

    #[error("actor has already been stopped")]
    AlreadyStopped,

    /// The body did not exit within the stop grace window.
    #[error("actor did not exit after the stop signal")]
    RefusedToStop,

    /// `put` without a prior `connect`, or a connection that cannot
    /// deliver.
    #[error("actor has no outgoing connection")]
    NoRoute,

    /// A second `connect`; the outbound connection is single.
    #[error("actor already has an outgoing connection")]
    AlreadyConnected,

    #[error(transparent)]
    Mailbox(#[from] MailboxError),
}

/// How an actor body terminates early. Produced by `?` on context
/// operations ([`StopSignal`], [`MailboxError`]) or by failing with a
/// [`Fault`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Stopped(#[from] StopSignal),

    #[error(transparent)]
    Fault(#[from] Fault),

    #[error(transparent)]
    Mailbox(#[from] MailboxError),
}

/// Lifecycle and routing errors hit inside a body (`spawn`, `put`, ...)
/// terminate it as failures.
impl From<ActorError> for RunError {
    fn from(err: ActorError) -> Self {
        match err {
            ActorError::Mailbox(e) => RunError::Mailbox(e),
            other => RunError::Fault(Fault::new(other.to_string())),
        }
    }
}
