//! Remoting error types.

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::message::NodeAddr;

/// Errors surfaced by transport implementations.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("address {addr} is already bound on this network")]
    AddressInUse { addr: NodeAddr },

    #[error("no connection to {addr} has been established")]
    NotConnected { addr: NodeAddr },

    #[error("already connected to {addr}")]
    AlreadyConnected { addr: NodeAddr },

    #[error("invalid endpoint: {reason}")]
    InvalidEndpoint { reason: String },

    #[error("malformed address {addr}: expected <host>:<port>")]
    MalformedAddress { addr: NodeAddr },
}

/// Errors of the wire codec.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Errors raised while constructing a hub.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("failed to bind incoming transport: {0}")]
    Bind(#[source] TransportError),
}
