//! Remoting: the hub that carries messages between actors on different
//! nodes.
//!
//! Each node runs one [`Hub`]. Outbound actor messages are multiplexed
//! onto a single outgoing transport keyed by destination [`crate::message::NodeAddr`];
//! a heartbeat-driven liveness state machine runs per peer; messages for
//! peers not yet confirmed reachable are buffered and flushed on contact,
//! aged out as dead letters, or abandoned when hope runs out. Inbound
//! frames are decoded with a ref-rewriting step so every
//! [`crate::actor::ActorRef`] that arrives over the wire comes out bound
//! to a live target on this hub.
//!
//! # Components
//!
//! - [`Hub`] - the per-node remoting core
//! - [`HubConfig`] - heartbeat and queue tuning
//! - [`PeerState`] / [`PeerSnapshot`] - liveness states and introspection
//! - [`RemoteProxy`] - ref target that forwards sends through the hub
//! - [`IncomingTransport`] / [`OutgoingTransport`] / [`Endpoint`] - wire seams
//! - [`wire`] - heartbeat literals and the frame codec
//!
//! # Peer liveness
//!
//! Four states per peer, two wire signals (`ping`, `pong`):
//!
//! - `RadioSilence` - we send, have not heard back
//! - `ReverseRadioSilence` - they pinged, no pong/payload yet
//! - `Visible` - bidirectional freshness; transmit directly
//! - `SilentlyHoping` - gave up queueing; still probing with pings

mod config;
mod error;
mod hub;
mod peer;
mod proxy;
mod transport;
pub mod wire;

pub use config::{
    HubConfig, DEFAULT_HEARTBEAT_TICK, DEFAULT_MAX_SILENCE_BETWEEN_HEARTBEATS,
    DEFAULT_QUEUE_CLEAN_TICK, DEFAULT_TIME_TO_KEEP_HOPE,
};
pub use error::{HubError, TransportError, WireError};
pub use hub::Hub;
pub use peer::{PeerSnapshot, PeerState};
pub use proxy::RemoteProxy;
pub use transport::{Endpoint, InboundHandler, IncomingTransport, OutgoingTransport};
