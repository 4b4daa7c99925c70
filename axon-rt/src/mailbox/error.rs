//! Mailbox error types.

// Layer 2: Third-party crate imports
use thiserror::Error;

/// Errors surfaced by mailbox operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MailboxError {
    /// A receive is already pending on this mailbox; at most one waiter
    /// may be installed at a time.
    #[error("a receive is already pending on this mailbox")]
    Busy,
}
