//! The actor core: cooperative message-driven bodies with supervision.
//!
//! An actor is a user-supplied async body ([`Actor::run`]) driven by a
//! *cell* ([`ActorHandle`]): the cell owns the mailbox, the lifecycle
//! state machine (not-started → running ⇄ paused → stopped), the
//! parent/children supervision tree, and the single outbound connection.
//! Every await inside a body passes through the cell's gate, which is what
//! makes pause (stash the completed value), resume (release it) and stop
//! (fail the await with the stop signal) possible from the outside.
//!
//! Supervision is propagation, not policy: when a child terminates for any
//! reason, its parent receives exactly one `("exit", child_ref, reason)`
//! message and the child unlinks itself. What to do about it is the
//! parent's own `run` code.
//!
//! # Components
//!
//! - [`Actor`] - the body trait
//! - [`ActorHandle`] - external cell handle (start/pause/resume/stop/...)
//! - [`ActorContext`] - in-body surface (recv/spawn/sleep/put/...)
//! - [`ActorRef`] / [`RefTarget`] - the addressable handle that crosses nodes
//! - [`ActorState`] / [`ExitReason`] - lifecycle vocabulary

mod cell;
mod context;
mod error;
mod lifecycle;
mod reference;
mod traits;

pub use cell::ActorHandle;
pub use context::ActorContext;
pub use error::{ActorError, RunError, StopSignal};
pub use lifecycle::{ActorState, ExitReason, EXIT};
pub use reference::{ActorRef, RefTarget, UnboundRef};
pub use traits::{Actor, RunResult};
