//! The remote stand-in target of an actor reference.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::Weak;

// Layer 3: Internal module imports
use super::hub::Hub;
use crate::message::{ActorPath, Msg, NodeAddr};

/// A proxy representing an actor on another node.
///
/// Delegates every message it receives to the [`Hub`] it is bound to,
/// together with the `(path, node)` address of the actor it stands in for.
/// Remote delivery is always asynchronous; there is no synchronous-send
/// variant to ask for.
#[derive(Clone)]
pub struct RemoteProxy {
    path: ActorPath,
    node: NodeAddr,
    hub: Weak<Hub>,
}

impl RemoteProxy {
    pub(crate) fn new(path: ActorPath, node: NodeAddr, hub: Weak<Hub>) -> Self {
        Self { path, node, hub }
    }

    pub fn path(&self) -> &ActorPath {
        &self.path
    }

    pub fn node(&self) -> &NodeAddr {
        &self.node
    }

    /// Hand the message to the bound hub for remote delivery.
    pub fn receive(&self, msg: Msg) {
        match self.hub.upgrade() {
            Some(hub) => hub.send_message(&self.path, &self.node, msg),
            None => {
                tracing::warn!(path = %self.path, node = %self.node,
                    "dropping message for remote actor: hub is gone");
            }
        }
    }

    /// Whether this proxy is bound to the given hub.
    pub fn bound_to(&self, hub: &std::sync::Arc<Hub>) -> bool {
        self.hub
            .upgrade()
            .is_some_and(|h| std::sync::Arc::ptr_eq(&h, hub))
    }
}

impl fmt::Debug for RemoteProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteProxy")
            .field("path", &self.path)
            .field("node", &self.node)
            .finish()
    }
}
