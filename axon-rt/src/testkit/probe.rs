//! A recorder actor for observing deliveries in tests.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorContext, ActorError, ActorHandle, ActorRef, RunResult};
use crate::message::{ActorPath, Msg};

/// An actor that records every message it receives.
///
/// Register its [`aref`](Probe::aref) on a hub (or connect another actor
/// to it) and inspect [`messages`](Probe::messages) afterwards.
pub struct Probe {
    handle: ActorHandle,
    log: Arc<Mutex<Vec<Msg>>>,
}

struct Recorder {
    log: Arc<Mutex<Vec<Msg>>>,
}

#[async_trait]
impl Actor for Recorder {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
        loop {
            let msg = ctx.recv().await?;
            self.log.lock().push(msg);
        }
    }
}

impl Probe {
    /// Spawn a recorder at the given path.
    pub fn spawn(path: impl Into<ActorPath>) -> Result<Self, ActorError> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handle = ActorHandle::spawn(
            Recorder {
                log: Arc::clone(&log),
            },
            path,
        )?;
        Ok(Self { handle, log })
    }

    pub fn handle(&self) -> &ActorHandle {
        &self.handle
    }

    pub fn aref(&self) -> ActorRef {
        self.handle.aref()
    }

    /// Everything recorded so far, in arrival order.
    pub fn messages(&self) -> Vec<Msg> {
        self.log.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }
}
