//! String newtypes for actor paths and node addresses.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

/// Opaque string identifying an actor within its node.
///
/// Unique per node for registered actors; duplicate registration replaces
/// the prior entry (last writer wins).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorPath(String);

impl ActorPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorPath {
    fn from(path: &str) -> Self {
        Self(path.to_owned())
    }
}

impl From<String> for ActorPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// Node address used as the connection key by the remoting hub.
///
/// Shaped like `<host>:<port>` on a real transport; an arbitrary opaque
/// identifier is accepted everywhere except the mock network, which
/// validates the shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeAddr(String);

impl NodeAddr {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeAddr {
    fn from(addr: &str) -> Self {
        Self(addr.to_owned())
    }
}

impl From<String> for NodeAddr {
    fn from(addr: String) -> Self {
        Self(addr)
    }
}
