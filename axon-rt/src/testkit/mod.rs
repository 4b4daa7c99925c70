//! Deterministic test harness: a mock network and a recorder actor.
//!
//! The mock network is the primary test vehicle for the remoting hub. It
//! hands out hubs wired to in-memory sockets, accumulates their sends in a
//! FIFO, and delivers the current batch atomically on [`MockNetwork::transmit`].
//! [`MockNetwork::simulate`] alternates transmission with advancing the
//! paused tokio clock, so heartbeat ticks, queue aging, and deliveries all
//! happen in a fully controlled order. Packet loss can be injected per
//! directed `(src, dst)` pair with a seeded RNG.
//!
//! Everything here requires a current-thread runtime with the clock
//! paused: `#[tokio::test(start_paused = true)]`.

mod network;
mod probe;

pub use network::MockNetwork;
pub use probe::Probe;
