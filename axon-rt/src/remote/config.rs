//! Hub configuration with sensible defaults.

// Layer 1: Standard library
use std::time::Duration;

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

/// Default maximum silence tolerated before a peer is considered dead (5 seconds)
pub const DEFAULT_MAX_SILENCE_BETWEEN_HEARTBEATS: Duration = Duration::from_secs(5);

/// Default time to keep probing a dead peer before giving up on its queue (55 seconds)
pub const DEFAULT_TIME_TO_KEEP_HOPE: Duration = Duration::from_secs(55);

/// Default heartbeat tick period (1 second)
pub const DEFAULT_HEARTBEAT_TICK: Duration = Duration::from_secs(1);

/// Default queue-aging tick period (1 second)
pub const DEFAULT_QUEUE_CLEAN_TICK: Duration = Duration::from_secs(1);

/// Tuning knobs of a [`super::Hub`].
///
/// The queue item lifetime defaults to twice the heartbeat silence limit,
/// so undeliverable messages turn into dead letters long before the peer
/// itself is given up on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Silence tolerated before a peer is considered dead.
    pub max_silence_between_heartbeats: Duration,

    /// How long past deadness the hub keeps queueing before abandoning.
    pub time_to_keep_hope: Duration,

    /// Age at which a queued outbound message becomes a dead letter.
    pub queue_item_lifetime: Duration,

    /// Period of the liveness/heartbeat tick.
    pub heartbeat_tick: Duration,

    /// Period of the queue-aging tick.
    pub queue_clean_tick: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_silence_between_heartbeats: DEFAULT_MAX_SILENCE_BETWEEN_HEARTBEATS,
            time_to_keep_hope: DEFAULT_TIME_TO_KEEP_HOPE,
            queue_item_lifetime: DEFAULT_MAX_SILENCE_BETWEEN_HEARTBEATS * 2,
            heartbeat_tick: DEFAULT_HEARTBEAT_TICK,
            queue_clean_tick: DEFAULT_QUEUE_CLEAN_TICK,
        }
    }
}
