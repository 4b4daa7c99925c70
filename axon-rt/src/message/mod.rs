//! Dynamic message values and addressing newtypes.
//!
//! Everything that travels through a mailbox or across the wire is a
//! [`Msg`]: a closed variant tree of plain values, tuples, actor
//! references, and the two reserved termination payloads ([`Msg::Stopped`]
//! and [`Msg::Fault`]). Actors select messages out of their mailbox with
//! structural patterns (see [`crate::pattern`]) rather than static types,
//! so the value tree is deliberately small and serializable.
//!
//! # Components
//!
//! - [`Msg`] - the dynamic message value
//! - [`MsgKind`] - discriminant used by kind patterns
//! - [`Fault`] - cloneable failure reason carried in exit messages
//! - [`ActorPath`] - opaque per-node actor identifier
//! - [`NodeAddr`] - opaque node address (connection key)

mod addr;
mod fault;
mod value;

pub use addr::{ActorPath, NodeAddr};
pub use fault::Fault;
pub use value::{Msg, MsgKind};
