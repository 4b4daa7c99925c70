//! # axon-rt - Distributed Actor Runtime with a Remoting Hub
//!
//! Message-driven cooperative actors with supervision, plus the remoting
//! core that carries messages between actors on different nodes over a
//! datagram-style transport.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use axon_rt::actor::{Actor, ActorContext, ActorHandle, RunResult};
//! use axon_rt::message::Msg;
//! use axon_rt::pattern::{any, lit, tup};
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl Actor for Greeter {
//!     async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
//!         loop {
//!             // Receive ("greet", <who>) tuples, whoever sent them.
//!             let caps = ctx.recv_match(tup([lit("greet"), any()])).await?;
//!             println!("hello, {}", caps[0]);
//!         }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let greeter = ActorHandle::spawn(Greeter, "/greeter")?;
//!     greeter.send(Msg::tuple([Msg::from("greet"), Msg::from("world")]));
//!     Ok(())
//! }
//! ```
//!
//! Two hubs talking over the mock network:
//!
//! ```rust,ignore
//! use axon_rt::message::Msg;
//! use axon_rt::testkit::{MockNetwork, Probe};
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let net = MockNetwork::new();
//! let a = net.node("127.0.0.1:11001")?;
//! let b = net.node("127.0.0.1:11002")?;
//!
//! let probe = Probe::spawn("/actor")?;
//! b.register(probe.aref());
//!
//! a.make_proxy("/actor", "127.0.0.1:11002").receive(Msg::from("hello"));
//! net.simulate(Duration::from_secs(2), Duration::from_millis(100)).await;
//! assert_eq!(probe.messages(), vec![Msg::from("hello")]);
//! # Ok(())
//! # }
//! ```
//!
//! # Core Concepts
//!
//! ## Actors
//!
//! An actor is an async body driven by its cell ([`actor::ActorHandle`]):
//! it receives messages from a pattern-filtered mailbox, spawns children,
//! and can be paused, resumed, and stopped from the outside. Every await
//! inside a body is a lifecycle suspension point. Supervision is
//! propagation only: a terminating child sends `("exit", child, reason)`
//! to its parent, and policy lives in the parent's own body.
//!
//! ## Remoting
//!
//! Each node runs one [`remote::Hub`]. Sending through a
//! [`remote::RemoteProxy`] multiplexes frames onto a single outgoing
//! transport keyed by destination address. Peers move through a
//! heartbeat-driven liveness state machine; messages for unconfirmed peers
//! are buffered, flushed on contact, aged into dead letters, or abandoned
//! when hope runs out. Refs decoded from the wire are rewritten into live
//! targets bound to the receiving hub.
//!
//! ## Determinism
//!
//! The runtime is single-threaded cooperative and keeps all timing on the
//! tokio clock, so the [`testkit::MockNetwork`] can run whole multi-node
//! scenarios under a paused clock with reproducible interleavings.
//!
//! # Module Organization
//!
//! - [`actor`] - actor bodies, cells, lifecycle, refs
//! - [`mailbox`] - pattern-filtered message queue
//! - [`message`] - dynamic message values and addressing
//! - [`pattern`] - structural pattern matching
//! - [`remote`] - the hub, peer liveness, wire codec, transport seams
//! - [`events`] - dead letters and event sinks
//! - [`testkit`] - mock network and probe actor
//! - [`util`] - timeout wrapper

pub mod actor;
pub mod events;
pub mod mailbox;
pub mod message;
pub mod pattern;
pub mod remote;
pub mod testkit;
pub mod util;

// Re-export commonly used types
pub use actor::{
    Actor, ActorContext, ActorError, ActorHandle, ActorRef, ActorState, ExitReason, RefTarget,
    RunError, RunResult, StopSignal,
};
pub use events::{DeadLetter, Event, EventRecord, EventSink, InMemoryEventSink, NoopEventSink};
pub use mailbox::{Mailbox, MailboxError, Receive};
pub use message::{ActorPath, Fault, Msg, MsgKind, NodeAddr};
pub use pattern::Pattern;
pub use remote::{Hub, HubConfig, HubError, PeerSnapshot, PeerState, RemoteProxy};
pub use util::{with_timeout, TimeoutError};
