//! The per-node remoting core.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::Instant;

// Layer 3: Internal module imports
use super::config::HubConfig;
use super::error::HubError;
use super::peer::{PeerConn, PeerSnapshot, PeerState, PendingMsg};
use super::proxy::RemoteProxy;
use super::transport::{Endpoint, IncomingTransport, OutgoingTransport};
use super::wire::{self, Heartbeat};
use crate::actor::{ActorRef, RefTarget};
use crate::events::{DeadLetter, Event, EventSink};
use crate::message::{ActorPath, Msg, NodeAddr};

/// Handles traffic between actors on different nodes.
///
/// One hub per node. The wire transports are injected through the
/// [`IncomingTransport`]/[`OutgoingTransport`] seams; during construction
/// the hub installs its inbound callback, binds the incoming side to its
/// own address, and starts the heartbeat and queue-aging ticks.
///
/// The hub is the single writer of its peer table; the registry is written
/// by [`register`](Hub::register) and read on inbound delivery.
pub struct Hub {
    node: NodeAddr,
    config: HubConfig,
    outgoing: Box<dyn OutgoingTransport>,
    // Held so the inbound side (and its callback into us) stays alive.
    incoming: Box<dyn IncomingTransport>,
    registry: DashMap<ActorPath, ActorRef>,
    peers: Mutex<HashMap<NodeAddr, PeerConn>>,
    events: Arc<dyn EventSink>,
}

impl Hub {
    /// Wire a hub to its transports and start its ticks.
    pub fn new(
        incoming: Box<dyn IncomingTransport>,
        outgoing: Box<dyn OutgoingTransport>,
        node: impl Into<NodeAddr>,
        config: HubConfig,
        events: Arc<dyn EventSink>,
    ) -> Result<Arc<Self>, HubError> {
        let node = node.into();
        let hub = Arc::new(Self {
            node: node.clone(),
            config,
            outgoing,
            incoming,
            registry: DashMap::new(),
            peers: Mutex::new(HashMap::new()),
            events,
        });

        // Callback first, bind second: no frame may arrive unhandled.
        let weak = Arc::downgrade(&hub);
        hub.incoming
            .set_message_handler(Box::new(move |sender, data| {
                if let Some(hub) = weak.upgrade() {
                    hub.got_message(sender, data);
                }
            }));
        hub.incoming
            .add_endpoints(vec![Endpoint::Bind(node)])
            .map_err(HubError::Bind)?;

        Self::spawn_ticks(&hub);
        Ok(hub)
    }

    /// This hub's own node address.
    pub fn node(&self) -> &NodeAddr {
        &self.node
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn events(&self) -> &Arc<dyn EventSink> {
        &self.events
    }

    /// Record a local actor so inbound messages can find it. Registering a
    /// path twice replaces the previous entry.
    pub fn register(&self, target: ActorRef) {
        self.registry.insert(target.path().clone(), target);
    }

    /// A proxy for `(path, node)` bound to this hub.
    pub fn make_proxy(
        self: &Arc<Self>,
        path: impl Into<ActorPath>,
        node: impl Into<NodeAddr>,
    ) -> RemoteProxy {
        RemoteProxy::new(path.into(), node.into(), Arc::downgrade(self))
    }

    /// A remote-bound [`ActorRef`] for `(path, node)`.
    pub fn proxy_ref(
        self: &Arc<Self>,
        path: impl Into<ActorPath>,
        node: impl Into<NodeAddr>,
    ) -> ActorRef {
        ActorRef::remote(self.make_proxy(path, node))
    }

    pub fn peer_state(&self, addr: &NodeAddr) -> Option<PeerState> {
        self.peers.lock().get(addr).map(|conn| conn.state)
    }

    pub fn peer_snapshot(&self, addr: &NodeAddr) -> Option<PeerSnapshot> {
        self.peers.lock().get(addr).map(|conn| PeerSnapshot {
            state: conn.state,
            queued: conn.queued(),
        })
    }

    /// Top-level outbound operation: deliver `msg` to `path` on `node`.
    ///
    /// While the peer is `Visible` the frame is transmitted immediately;
    /// otherwise it is queued with its enqueue time, unless queueing has
    /// been abandoned, in which case it becomes a dead letter right away.
    pub fn send_message(&self, path: &ActorPath, node: &NodeAddr, msg: Msg) {
        let now = Instant::now();
        let mut peers = self.peers.lock();
        if !peers.contains_key(node) {
            tracing::debug!(peer = %node, "peer not-known => radiosilence");
            // Backdate freshness so continued silence turns into
            // silentlyhoping exactly time_to_keep_hope from now.
            let last_seen = now
                .checked_sub(self.config.max_silence_between_heartbeats)
                .unwrap_or(now);
            peers.insert(
                node.clone(),
                PeerConn::new(PeerState::RadioSilence, last_seen),
            );
            self.connect_peer(node, PeerState::RadioSilence);
        }
        let Some(conn) = peers.get_mut(node) else {
            return;
        };

        if conn.state == PeerState::Visible {
            self.transmit(node, path, &msg);
        } else if let Some(queue) = conn.queue.as_mut() {
            queue.push_back((
                PendingMsg {
                    path: path.clone(),
                    node: node.clone(),
                    msg,
                },
                now,
            ));
        } else {
            self.emit_dead_letter(PendingMsg {
                path: path.clone(),
                node: node.clone(),
                msg,
            });
        }
    }

    /// Inbound callback installed on the incoming transport.
    ///
    /// Heartbeats never reach the registry; payload frames are decoded
    /// with the ref-rewriting step and delivered (or dead-lettered when
    /// the path is unknown). Either way the sender's liveness book-keeping
    /// runs afterwards, flushing the queue on a transition into `Visible`.
    pub fn got_message(self: &Arc<Self>, sender: NodeAddr, data: Bytes) {
        let heartbeat = wire::heartbeat(&data);
        match heartbeat {
            Some(signal) => {
                tracing::trace!(peer = %sender, %signal, "heartbeat");
            }
            None => {
                let (path, mut msg) = match wire::decode(&data) {
                    Ok(frame) => frame,
                    Err(err) => {
                        tracing::warn!(peer = %sender, error = %err, "dropping undecodable frame");
                        return;
                    }
                };
                self.bind_refs(&mut msg);
                tracing::trace!(peer = %sender, %path, "inbound message");
                match self.registry.get(&path) {
                    Some(target) => {
                        let _ = target.send(msg);
                    }
                    None => {
                        self.events.log(Event::DeadLetter(DeadLetter {
                            target: ActorRef::unbound(path, None),
                            message: msg,
                        }));
                    }
                }
            }
        }

        let is_ping = heartbeat == Some(Heartbeat::Ping);
        let now = Instant::now();
        let mut peers = self.peers.lock();
        if let Some(conn) = peers.get_mut(&sender) {
            conn.last_seen = now;
            let prev = conn.state;
            conn.state = if is_ping {
                PeerState::ReverseRadioSilence
            } else {
                PeerState::Visible
            };
            if prev != conn.state {
                tracing::debug!(peer = %sender, from = %prev, to = %conn.state, "peer state changed");
            }
            if prev != PeerState::Visible && conn.state == PeerState::Visible {
                if let Some(queue) = conn.queue.as_mut() {
                    let drained: Vec<PendingMsg> = queue.drain(..).map(|(msg, _)| msg).collect();
                    for pending in drained {
                        self.transmit(&sender, &pending.path, &pending.msg);
                    }
                }
            }
        } else {
            if !is_ping {
                // Protocol says the first frame from a new peer is a ping,
                // but a peer that lost its own state (crash-restart) may
                // lead with a payload. Tolerate it as an implicit ping.
                tracing::warn!(peer = %sender, "first frame from unknown peer was not ping");
                self.events.log(Event::ProtocolViolation {
                    peer: sender.clone(),
                });
            }
            tracing::debug!(peer = %sender, "peer not-known => reverse-radiosilence");
            peers.insert(
                sender.clone(),
                PeerConn::new(PeerState::ReverseRadioSilence, now),
            );
            self.connect_peer(&sender, PeerState::ReverseRadioSilence);
        }
    }

    /// Add the outgoing endpoint for a newly met peer and send one
    /// heartbeat immediately for better latency.
    fn connect_peer(&self, addr: &NodeAddr, state: PeerState) {
        if let Err(err) = self
            .outgoing
            .add_endpoints(vec![Endpoint::Connect(addr.clone())])
        {
            tracing::error!(peer = %addr, error = %err, "failed to add outgoing endpoint");
            return;
        }
        let signal = if state == PeerState::RadioSilence {
            Heartbeat::Ping
        } else {
            Heartbeat::Pong
        };
        self.heartbeat_one(addr, signal);
    }

    fn heartbeat_one(&self, addr: &NodeAddr, signal: Heartbeat) {
        tracing::trace!(peer = %addr, %signal, "sending heartbeat");
        if let Err(err) = self.outgoing.send_msg(addr, signal.payload()) {
            tracing::error!(peer = %addr, error = %err, "failed to send heartbeat");
        }
    }

    fn transmit(&self, dst: &NodeAddr, path: &ActorPath, msg: &Msg) {
        let payload = match wire::encode(path, msg) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(peer = %dst, %path, error = %err, "failed to encode frame");
                return;
            }
        };
        if let Err(err) = self.outgoing.send_msg(dst, payload) {
            tracing::error!(peer = %dst, error = %err, "failed to transmit frame");
        }
    }

    fn emit_dead_letter(&self, pending: PendingMsg) {
        self.events.log(Event::DeadLetter(DeadLetter {
            target: ActorRef::unbound(pending.path, Some(pending.node)),
            message: pending.msg,
        }));
    }

    /// Rewrite every unbound ref in a decoded message into a live target:
    /// the locally registered actor when the ref addresses this node, a
    /// proxy bound to this hub otherwise. Refs with no node address are
    /// left alone.
    fn bind_refs(self: &Arc<Self>, msg: &mut Msg) {
        match msg {
            Msg::Ref(aref) => {
                if !aref.is_unbound() {
                    return;
                }
                let Some(node) = aref.node().cloned() else {
                    return;
                };
                if node == self.node {
                    if let Some(local) = self.registry.get(aref.path()) {
                        aref.rebind(local.target().clone());
                        return;
                    }
                }
                let proxy = self.make_proxy(aref.path().clone(), node);
                aref.rebind(RefTarget::Remote(proxy));
            }
            Msg::Tuple(items) => {
                for item in items {
                    self.bind_refs(item);
                }
            }
            _ => {}
        }
    }

    fn spawn_ticks(hub: &Arc<Self>) {
        let weak = Arc::downgrade(hub);
        let period = hub.config.heartbeat_tick;
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            loop {
                tick.tick().await;
                let Some(hub) = weak.upgrade() else { break };
                hub.send_heartbeats();
            }
        });

        let weak = Arc::downgrade(hub);
        let period = hub.config.queue_clean_tick;
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            loop {
                tick.tick().await;
                let Some(hub) = weak.upgrade() else { break };
                hub.clean_queue();
            }
        });
    }

    /// The liveness tick: classify every peer by how long it has been
    /// silent and probe accordingly. A peer silent past the hope window
    /// has its queue converted to dead letters and abandoned.
    fn send_heartbeats(&self) {
        let now = Instant::now();
        let max_silence = self.config.max_silence_between_heartbeats;
        let lost_after = max_silence + self.config.time_to_keep_hope;

        let mut peers = self.peers.lock();
        for (addr, conn) in peers.iter_mut() {
            let silent_for = now.duration_since(conn.last_seen);
            if conn.state == PeerState::SilentlyHoping {
                self.heartbeat_one(addr, Heartbeat::Ping);
            } else if silent_for > lost_after {
                tracing::debug!(peer = %addr, from = %conn.state,
                    silent_secs = silent_for.as_secs(), "peer => silentlyhoping");
                conn.state = PeerState::SilentlyHoping;
                if let Some(queue) = conn.queue.take() {
                    for (pending, _) in queue {
                        self.emit_dead_letter(pending);
                    }
                }
                self.heartbeat_one(addr, Heartbeat::Ping);
            } else if silent_for > max_silence {
                if conn.state != PeerState::RadioSilence {
                    tracing::debug!(peer = %addr, from = %conn.state, "peer => radiosilence");
                    conn.state = PeerState::RadioSilence;
                }
                self.heartbeat_one(addr, Heartbeat::Ping);
            } else {
                self.heartbeat_one(addr, Heartbeat::Pong);
            }
        }
    }

    /// The aging tick: pop queued items older than the configured lifetime
    /// into dead letters. Enqueue times are monotonically non-decreasing,
    /// so stopping at the first kept item is correct.
    fn clean_queue(&self) {
        let now = Instant::now();
        let lifetime = self.config.queue_item_lifetime;

        let mut peers = self.peers.lock();
        for conn in peers.values_mut() {
            let Some(queue) = conn.queue.as_mut() else {
                continue;
            };
            loop {
                let expired = queue
                    .front()
                    .is_some_and(|(_, enqueued)| now.duration_since(*enqueued) > lifetime);
                if !expired {
                    break;
                }
                if let Some((pending, _)) = queue.pop_front() {
                    self.emit_dead_letter(pending);
                }
            }
        }
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub").field("node", &self.node).finish()
    }
}
