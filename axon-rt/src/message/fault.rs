//! Cloneable failure reason for exit messages and wire transfer.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failure reason that can be cloned, matched on, and sent across nodes.
///
/// Actor bodies fail with a `Fault`; the supervising parent receives it as
/// the third element of the `("exit", child, reason)` message. Because it
/// travels inside [`crate::message::Msg`], it carries only data, never a
/// live error object.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Fault {
    message: String,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Capture an arbitrary error as a fault, keeping its display form.
    pub fn from_error(err: &(dyn std::error::Error + '_)) -> Self {
        Self {
            message: err.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
