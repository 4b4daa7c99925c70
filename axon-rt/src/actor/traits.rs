//! The actor body trait.

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::context::ActorContext;
use super::error::RunError;
use crate::message::Msg;

/// Outcome of an actor body: an optional return value (which becomes the
/// exit reason seen by the parent), or an early termination.
pub type RunResult = Result<Option<Msg>, RunError>;

/// A cooperative actor body.
///
/// `run` is driven to completion by the cell created around it; it
/// receives messages, spawns children, and talks to its outbound
/// connection exclusively through the [`ActorContext`]. All context
/// operations are suspension points where pause, resume, and stop take
/// effect.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use axon_rt::actor::{Actor, ActorContext, RunResult};
/// use axon_rt::message::Msg;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Actor for Echo {
///     async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
///         loop {
///             let msg = ctx.recv().await?;
///             if msg == Msg::from("quit") {
///                 return Ok(None);
///             }
///             ctx.put(msg)?;
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Actor: Send + 'static {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult;
}
