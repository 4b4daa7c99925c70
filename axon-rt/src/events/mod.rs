//! Runtime event records and sinks.
//!
//! The remoting hub reports undeliverable traffic and protocol oddities as
//! [`Event`]s through an [`EventSink`]. Logging an event is fire-and-forget
//! and infallible; the hub never blocks on, or fails because of, its sink.
//!
//! # Components
//!
//! - [`Event`] / [`DeadLetter`] - the event payloads
//! - [`EventRecord`] - a timestamped, serializable event
//! - [`EventSink`] - the sink seam
//! - [`InMemoryEventSink`] - recording sink for tests and diagnostics
//! - [`NoopEventSink`] - discards everything

mod sink;
mod types;

pub use sink::{EventSink, InMemoryEventSink, NoopEventSink};
pub use types::{DeadLetter, Event, EventRecord};
