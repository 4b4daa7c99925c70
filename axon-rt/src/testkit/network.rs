//! The mock network and its socket stubs.

// Layer 1: Standard library imports
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use bytes::Bytes;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// Layer 3: Internal module imports
use crate::events::{DeadLetter, InMemoryEventSink};
use crate::message::NodeAddr;
use crate::remote::{
    Endpoint, Hub, HubConfig, HubError, InboundHandler, IncomingTransport, OutgoingTransport,
    TransportError,
};

const DEFAULT_SEED: u64 = 0x5eed;

struct Frame {
    src: NodeAddr,
    dst: NodeAddr,
    payload: Bytes,
}

struct InSocketShared {
    addr: NodeAddr,
    handler: Mutex<Option<InboundHandler>>,
}

struct NetState {
    listeners: HashMap<NodeAddr, Arc<InSocketShared>>,
    queue: Vec<Frame>,
    connections: HashSet<(NodeAddr, NodeAddr)>,
    packet_loss: HashMap<(NodeAddr, NodeAddr), f64>,
    rng: SmallRng,
    sinks: HashMap<NodeAddr, Arc<InMemoryEventSink>>,
}

/// A deterministic in-memory network of hubs.
///
/// Sends accumulate in a FIFO and move to their recipients only on
/// [`transmit`](MockNetwork::transmit), which decouples the order in which
/// tests set up nodes from the order in which messages flow.
pub struct MockNetwork {
    state: Arc<Mutex<NetState>>,
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// A network whose packet-loss rolls come from the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(NetState {
                listeners: HashMap::new(),
                queue: Vec::new(),
                connections: HashSet::new(),
                packet_loss: HashMap::new(),
                rng: SmallRng::seed_from_u64(seed),
                sinks: HashMap::new(),
            })),
        }
    }

    /// Create a hub on this network at `addr`, with mock sockets and an
    /// in-memory event sink (see [`events`](MockNetwork::events)).
    pub fn node(&self, addr: impl Into<NodeAddr>) -> Result<Arc<Hub>, HubError> {
        self.node_with_config(addr, HubConfig::default())
    }

    pub fn node_with_config(
        &self,
        addr: impl Into<NodeAddr>,
        config: HubConfig,
    ) -> Result<Arc<Hub>, HubError> {
        let addr = addr.into();
        validate_addr(&addr).map_err(HubError::Bind)?;

        let sink = InMemoryEventSink::new();
        self.state
            .lock()
            .sinks
            .insert(addr.clone(), Arc::clone(&sink));

        let insock = MockInSocket {
            shared: Arc::new(InSocketShared {
                addr: addr.clone(),
                handler: Mutex::new(None),
            }),
            net: Arc::clone(&self.state),
        };
        let outsock = MockOutSocket {
            src: addr.clone(),
            net: Arc::clone(&self.state),
        };
        Hub::new(Box::new(insock), Box::new(outsock), addr, config, sink)
    }

    /// Drop frames from `src` to `dst` with the given probability.
    pub fn packet_loss(&self, percent: u32, src: impl Into<NodeAddr>, dst: impl Into<NodeAddr>) {
        let probability = f64::from(percent.min(100)) / 100.0;
        self.state
            .lock()
            .packet_loss
            .insert((src.into(), dst.into()), probability);
    }

    /// Tear down a node: frames addressed to it fall on the floor from now
    /// on. Its hub keeps running and probing.
    pub fn drop_listener(&self, addr: impl Into<NodeAddr>) {
        self.state.lock().listeners.remove(&addr.into());
    }

    /// The event sink of a node created on this network.
    pub fn events(&self, addr: impl Into<NodeAddr>) -> Option<Arc<InMemoryEventSink>> {
        self.state.lock().sinks.get(&addr.into()).cloned()
    }

    /// Dead letters recorded on a node so far.
    pub fn dead_letters(&self, addr: impl Into<NodeAddr>) -> Vec<DeadLetter> {
        self.events(addr)
            .map(|sink| sink.dead_letters())
            .unwrap_or_default()
    }

    /// Frames sent but not yet transmitted.
    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Deliver the current batch of pending frames atomically, applying
    /// packet loss and dropping frames for missing listeners.
    pub fn transmit(&self) {
        let deliverable = {
            let mut state = self.state.lock();
            if state.queue.is_empty() {
                return;
            }
            let frames: Vec<Frame> = state.queue.drain(..).collect();
            let mut out = Vec::with_capacity(frames.len());
            for frame in frames {
                let loss = state
                    .packet_loss
                    .get(&(frame.src.clone(), frame.dst.clone()))
                    .copied()
                    .unwrap_or(0.0);
                if loss > 0.0 && state.rng.gen::<f64>() < loss {
                    tracing::debug!(src = %frame.src, dst = %frame.dst, "packet lost");
                    continue;
                }
                match state.listeners.get(&frame.dst) {
                    Some(shared) => out.push((Arc::clone(shared), frame)),
                    None => {
                        tracing::trace!(src = %frame.src, dst = %frame.dst,
                            "frame for missing listener dropped");
                    }
                }
            }
            out
        };

        // Handlers run outside the network lock: delivery re-enters the
        // hubs, which may send (and thus enqueue) in response.
        for (shared, frame) in deliverable {
            let handler = shared.handler.lock();
            if let Some(handler) = handler.as_ref() {
                handler(frame.src, frame.payload);
            }
        }
    }

    /// Alternate [`transmit`](MockNetwork::transmit) with advancing the
    /// paused clock by `step` until `duration` has elapsed.
    ///
    /// Requires `#[tokio::test(start_paused = true)]` (a current-thread
    /// runtime with the clock paused).
    pub async fn simulate(&self, duration: Duration, step: Duration) {
        assert!(step > Duration::ZERO, "simulation step must be positive");
        let mut remaining = duration;
        loop {
            self.transmit();
            tokio::time::advance(step).await;
            settle().await;
            if remaining <= step {
                break;
            }
            remaining -= step;
        }
        self.transmit();
        settle().await;
    }
}

/// Give woken tasks (hub ticks, actor bodies) a few scheduler turns.
async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

fn validate_addr(addr: &NodeAddr) -> Result<(), TransportError> {
    let ok = match addr.as_str().rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    };
    if ok {
        Ok(())
    } else {
        Err(TransportError::MalformedAddress { addr: addr.clone() })
    }
}

struct MockInSocket {
    shared: Arc<InSocketShared>,
    net: Arc<Mutex<NetState>>,
}

impl IncomingTransport for MockInSocket {
    fn add_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<(), TransportError> {
        let [Endpoint::Bind(addr)] = endpoints.as_slice() else {
            return Err(TransportError::InvalidEndpoint {
                reason: "hubs bind their in-socket to exactly one address".into(),
            });
        };
        if *addr != self.shared.addr {
            return Err(TransportError::InvalidEndpoint {
                reason: format!(
                    "hub may only bind its own address {} (got {addr})",
                    self.shared.addr
                ),
            });
        }
        let mut state = self.net.lock();
        if state.listeners.contains_key(addr) {
            return Err(TransportError::AddressInUse { addr: addr.clone() });
        }
        state
            .listeners
            .insert(addr.clone(), Arc::clone(&self.shared));
        Ok(())
    }

    fn set_message_handler(&self, handler: InboundHandler) {
        *self.shared.handler.lock() = Some(handler);
    }
}

struct MockOutSocket {
    src: NodeAddr,
    net: Arc<Mutex<NetState>>,
}

impl OutgoingTransport for MockOutSocket {
    fn add_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<(), TransportError> {
        let mut state = self.net.lock();
        for endpoint in endpoints {
            let Endpoint::Connect(addr) = endpoint else {
                return Err(TransportError::InvalidEndpoint {
                    reason: "out-sockets only connect, never bind".into(),
                });
            };
            validate_addr(&addr)?;
            let pair = (self.src.clone(), addr.clone());
            if state.connections.contains(&pair) {
                return Err(TransportError::AlreadyConnected { addr });
            }
            tracing::debug!(src = %self.src, dst = %addr, "connected");
            state.connections.insert(pair);
        }
        Ok(())
    }

    fn send_msg(&self, dst: &NodeAddr, payload: Bytes) -> Result<(), TransportError> {
        let mut state = self.net.lock();
        if !state.connections.contains(&(self.src.clone(), dst.clone())) {
            return Err(TransportError::NotConnected { addr: dst.clone() });
        }
        state.queue.push(Frame {
            src: self.src.clone(),
            dst: dst.clone(),
            payload,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_validation() {
        assert!(validate_addr(&"127.0.0.1:11001".into()).is_ok());
        assert!(validate_addr(&"somehost:9".into()).is_ok());
        assert!(validate_addr(&"nohost".into()).is_err());
        assert!(validate_addr(&":123".into()).is_err());
        assert!(validate_addr(&"host:".into()).is_err());
        assert!(validate_addr(&"host:12a".into()).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_bind_is_rejected() {
        let net = MockNetwork::new();
        assert!(net.node("127.0.0.1:11001").is_ok());
        assert!(net.node("127.0.0.1:11001").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_address_is_rejected() {
        let net = MockNetwork::new();
        assert!(net.node("not-an-address").is_err());
    }
}
