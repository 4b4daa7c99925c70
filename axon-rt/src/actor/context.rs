//! The in-body surface of an actor cell.

// Layer 1: Standard library imports
use std::future::Future;
use std::time::Duration;

// Layer 3: Internal module imports
use super::cell::ActorHandle;
use super::error::{ActorError, RunError};
use super::lifecycle::ExitReason;
use super::reference::ActorRef;
use super::traits::Actor;
use crate::message::{ActorPath, Msg};
use crate::pattern::Pattern;

/// Handed to [`super::Actor::run`]; every operation that suspends goes
/// through the cell's lifecycle gate, which is where pause, resume, and
/// stop act on the body.
pub struct ActorContext {
    handle: ActorHandle,
}

impl ActorContext {
    pub(crate) fn new(handle: ActorHandle) -> Self {
        Self { handle }
    }

    /// The cell this body runs in.
    pub fn handle(&self) -> &ActorHandle {
        &self.handle
    }

    pub fn path(&self) -> &ActorPath {
        self.handle.path()
    }

    /// A ref addressing this actor.
    pub fn aref(&self) -> ActorRef {
        self.handle.aref()
    }

    /// Receive the next message from the mailbox.
    pub async fn recv(&self) -> Result<Msg, RunError> {
        let receive = self.handle.get(None)?;
        let mut captures = self.handle.gate(receive).await?;
        Ok(captures.pop().unwrap_or(Msg::Nil))
    }

    /// Receive the first message matching `pattern`; resolves to the
    /// captured values in encounter order.
    pub async fn recv_match(&self, pattern: Pattern) -> Result<Vec<Msg>, RunError> {
        let receive = self.handle.get(Some(pattern))?;
        Ok(self.handle.gate(receive).await?)
    }

    /// Sleep, respecting pause and stop.
    pub async fn sleep(&self, duration: Duration) -> Result<(), RunError> {
        Ok(self.handle.gate(tokio::time::sleep(duration)).await?)
    }

    /// Await an arbitrary future through the lifecycle gate. On stop the
    /// future is cancelled by dropping it and the body sees the stop
    /// signal instead of the cancellation.
    pub async fn wait<F: Future>(&self, fut: F) -> Result<F::Output, RunError> {
        Ok(self.handle.gate(fut).await?)
    }

    /// Spawn a child actor under this one and start it.
    pub fn spawn<A: Actor>(
        &self,
        actor: A,
        path: impl Into<ActorPath>,
    ) -> Result<ActorHandle, ActorError> {
        self.handle.spawn_child(actor, path)
    }

    /// Wait for another actor to terminate.
    pub async fn join(&self, other: &ActorHandle) -> Result<ExitReason, RunError> {
        self.wait(other.wait_done()).await
    }

    /// Set the single outgoing connection used by [`put`](ActorContext::put).
    pub fn connect(&self, to: ActorRef) -> Result<(), ActorError> {
        self.handle.connect(to)
    }

    /// Forward a message to the connected outbound peer; `NoRoute` when
    /// nothing is connected.
    pub fn put(&self, msg: Msg) -> Result<(), ActorError> {
        self.handle.put(msg)
    }
}
