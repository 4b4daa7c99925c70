//! Per-actor message queue with pattern-filtered blocking receive.
//!
//! A [`Mailbox`] is a FIFO of [`crate::message::Msg`] values plus at most
//! one pending *waiter* (a pattern and a completion). Delivering a message
//! either completes a matching waiter directly or appends to the queue;
//! receiving scans the queue in order and removes the first match, or
//! installs the waiter. Installing a second waiter is a programming error
//! ([`MailboxError::Busy`]).
//!
//! Receives are cancel-safe: dropping a pending [`Receive`] removes its
//! waiter, and a message the waiter had already claimed is put back at the
//! front of the queue so nothing is lost.

mod error;
mod queue;

pub use error::MailboxError;
pub use queue::{Mailbox, Receive};
