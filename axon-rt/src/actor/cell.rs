//! The actor cell: lifecycle driver, supervision tree, pause gate.

// Layer 1: Standard library imports
use std::future::Future;
use std::sync::{Arc, Weak};

// Layer 2: Third-party crate imports
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::{watch, Notify};
use tokio_util::sync::CancellationToken;

// Layer 3: Internal module imports
use super::context::ActorContext;
use super::error::{ActorError, StopSignal};
use super::lifecycle::{exit_msg, ActorState, ExitReason};
use super::reference::ActorRef;
use super::traits::{Actor, RunResult};
use crate::mailbox::{Mailbox, MailboxError, Receive};
use crate::message::{ActorPath, Fault, Msg};
use crate::pattern::Pattern;

/// Scheduling rounds granted to a stopping actor before it is declared
/// unwilling. The runtime cannot preempt a body; it can only fail the
/// body's next gated await and give the cooperative scheduler a bounded
/// number of turns to let the unwind reach completion.
const STOP_GRACE_ROUNDS: usize = 128;

type Runnable = Box<dyn FnOnce(ActorContext) -> BoxFuture<'static, RunResult> + Send>;

struct CellInner {
    path: ActorPath,
    mailbox: Mailbox,
    state: Mutex<ActorState>,
    runnable: Mutex<Option<Runnable>>,
    stop: CancellationToken,
    resume: Notify,
    parent: Mutex<Option<Weak<CellInner>>>,
    children: Mutex<Vec<ActorHandle>>,
    outbound: Mutex<Option<ActorRef>>,
    done: watch::Sender<Option<ExitReason>>,
}

/// Cheap, cloneable handle to an actor cell.
///
/// Created with [`ActorHandle::create`]; drives the body after
/// [`start`](ActorHandle::start) and exposes the external lifecycle
/// surface: pause, resume, stop, send, get, connect/put, and the
/// supervision tree accessors.
#[derive(Clone)]
pub struct ActorHandle {
    inner: Arc<CellInner>,
}

impl ActorHandle {
    /// Wrap a body into a not-yet-started cell.
    pub fn create<A: Actor>(actor: A, path: impl Into<ActorPath>) -> Self {
        let (done, _) = watch::channel(None);
        let handle = Self {
            inner: Arc::new(CellInner {
                path: path.into(),
                mailbox: Mailbox::new(),
                state: Mutex::new(ActorState::NotStarted),
                runnable: Mutex::new(None),
                stop: CancellationToken::new(),
                resume: Notify::new(),
                parent: Mutex::new(None),
                children: Mutex::new(Vec::new()),
                outbound: Mutex::new(None),
                done,
            }),
        };
        let mut actor = actor;
        let runnable: Runnable = Box::new(move |mut ctx| -> BoxFuture<'static, RunResult> {
            Box::pin(async move { actor.run(&mut ctx).await })
        });
        *handle.inner.runnable.lock() = Some(runnable);
        handle
    }

    /// Create a cell and start it immediately.
    pub fn spawn<A: Actor>(actor: A, path: impl Into<ActorPath>) -> Result<Self, ActorError> {
        let handle = Self::create(actor, path);
        handle.start()?;
        Ok(handle)
    }

    /// Begin driving the body. Starting twice is an error; so is starting
    /// a stopped actor.
    pub fn start(&self) -> Result<(), ActorError> {
        {
            let mut state = self.inner.state.lock();
            match *state {
                ActorState::NotStarted => *state = ActorState::Running,
                ActorState::Running | ActorState::Paused => {
                    return Err(ActorError::AlreadyRunning)
                }
                ActorState::Stopped => return Err(ActorError::AlreadyStopped),
            }
        }
        let Some(runnable) = self.inner.runnable.lock().take() else {
            return Err(ActorError::AlreadyRunning);
        };

        let handle = self.clone();
        tokio::spawn(async move {
            let ctx = ActorContext::new(handle.clone());
            let outcome = runnable(ctx).await;
            let reason = match outcome {
                Ok(value) => ExitReason::Normal(value),
                Err(super::RunError::Stopped(_)) => ExitReason::Stopped,
                Err(super::RunError::Fault(fault)) => ExitReason::Failed(fault),
                Err(super::RunError::Mailbox(err)) => {
                    ExitReason::Failed(Fault::new(err.to_string()))
                }
            };
            handle.finish(reason).await;
        });
        Ok(())
    }

    /// Completion path, run on the driver task exactly once per actor:
    /// settle children, mark stopped, notify the parent, publish the
    /// reason.
    async fn finish(&self, reason: ExitReason) {
        let children: Vec<ActorHandle> = self.inner.children.lock().clone();
        if matches!(reason, ExitReason::Normal(_)) {
            // A body that returns normally still waits for its children.
            for child in children {
                child.wait_done().await;
            }
        } else {
            // Stopped or failed: take live children down rather than
            // waiting on bodies nobody will ever nudge again.
            for child in children {
                if child.state().is_alive() {
                    let _ = child.stop().await;
                }
            }
        }

        *self.inner.state.lock() = ActorState::Stopped;
        self.inner.stop.cancel();

        let parent = self
            .inner
            .parent
            .lock()
            .clone()
            .and_then(|weak| weak.upgrade())
            .map(|inner| ActorHandle { inner });
        if let Some(parent) = parent {
            if matches!(reason, ExitReason::Normal(Some(_))) {
                tracing::warn!(path = %self.inner.path, "child actor exited with a non-nil return value");
            }
            parent.unlink_child(self);
            parent.send(exit_msg(self.aref(), &reason));
        }

        self.inner.done.send_replace(Some(reason));
    }

    /// Suspend the body at its next (or current) await; recursively pause
    /// running children. A value completing while paused is stashed and
    /// released by [`resume`](ActorHandle::resume).
    pub fn pause(&self) -> Result<(), ActorError> {
        {
            let mut state = self.inner.state.lock();
            if *state != ActorState::Running {
                return Err(ActorError::NotRunning);
            }
            *state = ActorState::Paused;
        }
        for child in self.inner.children.lock().iter() {
            if child.state() == ActorState::Running {
                let _ = child.pause();
            }
        }
        Ok(())
    }

    /// Release a paused actor (delivering any stashed value); recursively
    /// resume paused children.
    pub fn resume(&self) -> Result<(), ActorError> {
        {
            let mut state = self.inner.state.lock();
            match *state {
                ActorState::Running => return Err(ActorError::AlreadyRunning),
                ActorState::Stopped => return Err(ActorError::AlreadyStopped),
                ActorState::NotStarted => return Err(ActorError::NotStarted),
                ActorState::Paused => *state = ActorState::Running,
            }
        }
        self.inner.resume.notify_waiters();
        for child in self.inner.children.lock().iter() {
            if child.state() == ActorState::Paused {
                let _ = child.resume();
            }
        }
        Ok(())
    }

    /// Terminate the actor: pause if running, cancel the outstanding
    /// await, inject the stop signal, and wait a bounded number of
    /// scheduler turns for the body to unwind. Children are stopped
    /// recursively by the completion path; the parent receives
    /// `("exit", self, Stopped)`.
    pub async fn stop(&self) -> Result<(), ActorError> {
        match self.state() {
            ActorState::NotStarted => return Err(ActorError::NotStarted),
            ActorState::Stopped => return Err(ActorError::AlreadyStopped),
            ActorState::Running => {
                let _ = self.pause();
            }
            ActorState::Paused => {}
        }

        self.inner.stop.cancel();
        self.inner.resume.notify_waiters();

        for _ in 0..STOP_GRACE_ROUNDS {
            if self.inner.done.borrow().is_some() {
                return Ok(());
            }
            tokio::task::yield_now().await;
        }
        Err(ActorError::RefusedToStop)
    }

    /// Wait for termination and return the reason.
    pub async fn wait_done(&self) -> ExitReason {
        let mut rx = self.inner.done.subscribe();
        loop {
            {
                let current = rx.borrow();
                if let Some(reason) = current.as_ref() {
                    return reason.clone();
                }
            }
            if rx.changed().await.is_err() {
                return ExitReason::Stopped;
            }
        }
    }

    /// Enqueue a message into this actor's mailbox, waking its waiter.
    /// Works in every lifecycle state.
    pub fn send(&self, msg: Msg) {
        self.inner.mailbox.deliver(msg);
    }

    /// Pattern-filtered receive on this actor's mailbox, usable from
    /// outside the body (tests, harnesses). `None` takes the front of the
    /// queue.
    pub fn get(&self, pattern: Option<Pattern>) -> Result<Receive<'_>, MailboxError> {
        self.inner.mailbox.recv(pattern)
    }

    /// Set the single outgoing connection used by [`put`](ActorHandle::put).
    pub fn connect(&self, to: ActorRef) -> Result<(), ActorError> {
        let mut outbound = self.inner.outbound.lock();
        if outbound.is_some() {
            return Err(ActorError::AlreadyConnected);
        }
        *outbound = Some(to);
        Ok(())
    }

    /// Forward a message to the connected outbound peer. Outgoing messages
    /// are never queued locally; without a connection this is `NoRoute`.
    pub fn put(&self, msg: Msg) -> Result<(), ActorError> {
        let target = self.inner.outbound.lock().clone();
        match target {
            Some(target) => target.send(msg).map_err(|_| ActorError::NoRoute),
            None => Err(ActorError::NoRoute),
        }
    }

    /// Spawn a child: records the parent link, appends to the children
    /// list, and starts it.
    pub fn spawn_child<A: Actor>(
        &self,
        actor: A,
        path: impl Into<ActorPath>,
    ) -> Result<ActorHandle, ActorError> {
        let child = ActorHandle::create(actor, path);
        *child.inner.parent.lock() = Some(Arc::downgrade(&self.inner));
        self.inner.children.lock().push(child.clone());
        if let Err(err) = child.start() {
            self.unlink_child(&child);
            return Err(err);
        }
        Ok(child)
    }

    fn unlink_child(&self, child: &ActorHandle) {
        self.inner
            .children
            .lock()
            .retain(|c| !Arc::ptr_eq(&c.inner, &child.inner));
    }

    pub fn state(&self) -> ActorState {
        *self.inner.state.lock()
    }

    pub fn is_alive(&self) -> bool {
        self.state().is_alive()
    }

    pub fn is_running(&self) -> bool {
        self.state() == ActorState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == ActorState::Paused
    }

    pub fn path(&self) -> &ActorPath {
        &self.inner.path
    }

    pub fn parent(&self) -> Option<ActorHandle> {
        self.inner
            .parent
            .lock()
            .clone()
            .and_then(|weak| weak.upgrade())
            .map(|inner| ActorHandle { inner })
    }

    /// Snapshot of the live children.
    pub fn children(&self) -> Vec<ActorHandle> {
        self.inner.children.lock().clone()
    }

    pub fn mailbox_len(&self) -> usize {
        self.inner.mailbox.len()
    }

    /// A local ref addressing this cell. Stamp it with
    /// [`ActorRef::at_node`] before letting it cross the wire.
    pub fn aref(&self) -> ActorRef {
        ActorRef::local(self.inner.path.clone(), self.clone())
    }

    pub fn same_cell(&self, other: &ActorHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Wrap an awaitable in the lifecycle gate.
    ///
    /// The gate is what every suspension point in a body goes through: if
    /// the value completes while the actor is paused it is stashed here
    /// until resume, and once stop has been requested the await fails with
    /// [`StopSignal`] (cancelling the wrapped future by dropping it).
    pub(crate) async fn gate<F: Future>(&self, fut: F) -> Result<F::Output, StopSignal> {
        tokio::select! {
            biased;
            () = self.inner.stop.cancelled() => Err(StopSignal),
            value = fut => {
                self.wait_while_paused().await?;
                Ok(value)
            }
        }
    }

    async fn wait_while_paused(&self) -> Result<(), StopSignal> {
        loop {
            if self.inner.stop.is_cancelled() {
                return Err(StopSignal);
            }
            if *self.inner.state.lock() != ActorState::Paused {
                return Ok(());
            }
            let notified = self.inner.resume.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            // Re-check before parking: resume may have slipped in between
            // the state read and the waiter registration.
            if *self.inner.state.lock() != ActorState::Paused || self.inner.stop.is_cancelled() {
                continue;
            }
            notified.await;
        }
    }
}

impl std::fmt::Debug for ActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorHandle")
            .field("path", &self.inner.path)
            .field("state", &self.state())
            .finish()
    }
}
