//! Event sink implementations.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
use super::types::{DeadLetter, Event, EventRecord};

/// Destination for runtime events. Implementations must not block and must
/// not fail; a sink that forwards somewhere unreliable should swallow and
/// log its own errors.
pub trait EventSink: Send + Sync + 'static {
    fn log(&self, event: Event);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn log(&self, _event: Event) {}
}

/// Records events in memory for later inspection.
///
/// The primary sink for tests; the mock network installs one per node.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    records: Mutex<Vec<EventRecord>>,
}

impl InMemoryEventSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().clone()
    }

    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| r.as_dead_letter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl EventSink for InMemoryEventSink {
    fn log(&self, event: Event) {
        self.records.lock().push(EventRecord::now(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorRef;
    use crate::message::Msg;

    #[test]
    fn test_in_memory_sink_records() {
        let sink = InMemoryEventSink::new();
        assert!(sink.is_empty());
        sink.log(Event::DeadLetter(DeadLetter {
            target: ActorRef::unbound("/nowhere".into(), None),
            message: Msg::from("lost"),
        }));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.dead_letters().len(), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_protocol_violation_is_not_a_dead_letter() {
        let sink = InMemoryEventSink::new();
        sink.log(Event::ProtocolViolation {
            peer: "10.0.0.1:9000".into(),
        });
        assert_eq!(sink.len(), 1);
        assert!(sink.dead_letters().is_empty());
    }
}
