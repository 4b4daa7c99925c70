//! The addressable actor handle that crosses node boundaries.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// Layer 3: Internal module imports
use super::cell::ActorHandle;
use crate::message::{ActorPath, Msg, NodeAddr};
use crate::remote::RemoteProxy;

/// What an [`ActorRef`] actually points at.
///
/// Only `(path, node)` ever crosses the wire; the target is rebuilt on the
/// receiving side. A freshly deserialized ref is `Unbound` until the
/// decoding hub rewrites it into `Local` (registered on this node) or
/// `Remote` (a proxy bound to the decoding hub).
#[derive(Clone)]
pub enum RefTarget {
    Unbound,
    Local(ActorHandle),
    Remote(RemoteProxy),
}

/// An opaque, addressable actor handle: `(path, node?, target?)`.
///
/// The single thing usable as a message destination, locally and across
/// nodes. Equality and serialization consider only the `(path, node)`
/// address; the target is runtime plumbing.
#[derive(Clone)]
pub struct ActorRef {
    path: ActorPath,
    node: Option<NodeAddr>,
    target: RefTarget,
}

/// Sending through a ref with no live target.
#[derive(Debug, Clone, Error)]
#[error("actor reference {path} is not bound to a target")]
pub struct UnboundRef {
    pub path: ActorPath,
}

impl ActorRef {
    /// A ref carrying only an address. Used for dead letters and as the
    /// decode-time placeholder before the hub rewrites the target.
    pub fn unbound(path: ActorPath, node: Option<NodeAddr>) -> Self {
        Self {
            path,
            node,
            target: RefTarget::Unbound,
        }
    }

    pub fn local(path: ActorPath, handle: ActorHandle) -> Self {
        Self {
            path,
            node: None,
            target: RefTarget::Local(handle),
        }
    }

    pub fn remote(proxy: RemoteProxy) -> Self {
        Self {
            path: proxy.path().clone(),
            node: Some(proxy.node().clone()),
            target: RefTarget::Remote(proxy),
        }
    }

    /// Stamp this ref with the node address it is reachable at, so that
    /// serializing it elsewhere produces a usable remote address.
    pub fn at_node(mut self, node: impl Into<NodeAddr>) -> Self {
        self.node = Some(node.into());
        self
    }

    pub fn path(&self) -> &ActorPath {
        &self.path
    }

    pub fn node(&self) -> Option<&NodeAddr> {
        self.node.as_ref()
    }

    pub fn target(&self) -> &RefTarget {
        &self.target
    }

    pub(crate) fn rebind(&mut self, target: RefTarget) {
        self.target = target;
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self.target, RefTarget::Unbound)
    }

    pub fn is_local(&self) -> bool {
        matches!(self.target, RefTarget::Local(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.target, RefTarget::Remote(_))
    }

    /// Deliver a message to the referenced actor.
    ///
    /// Local targets are enqueued directly; remote targets go through the
    /// hub the proxy is bound to and are always asynchronous.
    pub fn send(&self, msg: Msg) -> Result<(), UnboundRef> {
        match &self.target {
            RefTarget::Local(handle) => {
                handle.send(msg);
                Ok(())
            }
            RefTarget::Remote(proxy) => {
                proxy.receive(msg);
                Ok(())
            }
            RefTarget::Unbound => Err(UnboundRef {
                path: self.path.clone(),
            }),
        }
    }
}

impl PartialEq for ActorRef {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.node == other.node
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Some(node) => write!(f, "<{}@{}>", self.path, node),
            None => write!(f, "<{}>", self.path),
        }
    }
}

impl fmt::Debug for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match &self.target {
            RefTarget::Unbound => "unbound",
            RefTarget::Local(_) => "local",
            RefTarget::Remote(_) => "remote",
        };
        f.debug_struct("ActorRef")
            .field("path", &self.path)
            .field("node", &self.node)
            .field("target", &target)
            .finish()
    }
}

/// The wire form: `(path, node)` only.
#[derive(Serialize)]
#[serde(rename = "ActorRef")]
struct RefParts<'a> {
    path: &'a ActorPath,
    node: &'a Option<NodeAddr>,
}

#[derive(Deserialize)]
#[serde(rename = "ActorRef")]
struct RefPartsOwned {
    path: ActorPath,
    node: Option<NodeAddr>,
}

impl Serialize for ActorRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RefParts {
            path: &self.path,
            node: &self.node,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActorRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = RefPartsOwned::deserialize(deserializer)?;
        Ok(ActorRef::unbound(parts.path, parts.node))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests are allowed to use unwrap for simplicity
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        let original = ActorRef::unbound("/worker".into(), Some("10.0.0.1:9000".into()));
        let encoded = serde_json::to_vec(&original).unwrap();
        let decoded: ActorRef = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded.path().as_str(), "/worker");
        assert_eq!(decoded.node().map(NodeAddr::as_str), Some("10.0.0.1:9000"));
        assert!(decoded.is_unbound());
    }

    #[test]
    fn test_equality_ignores_target() {
        let a = ActorRef::unbound("/a".into(), None);
        let b = ActorRef::unbound("/a".into(), None);
        let c = ActorRef::unbound("/a".into(), Some("h:1".into()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_send_on_unbound_fails() {
        let r = ActorRef::unbound("/ghost".into(), None);
        assert!(r.send(Msg::Nil).is_err());
    }
}
