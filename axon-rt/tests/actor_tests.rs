//! Integration tests for the actor core: lifecycle, pause/resume/stop,
//! mailbox semantics through the public surface, and supervision.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use axon_rt::actor::{
    Actor, ActorContext, ActorError, ActorHandle, ActorState, ExitReason, RunError, RunResult,
    StopSignal, EXIT,
};
use axon_rt::mailbox::MailboxError;
use axon_rt::message::{Fault, Msg, MsgKind};
use axon_rt::pattern::{any, kind, lit, tup};

/// Give spawned driver tasks a few scheduler turns.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// Test Actors
// ============================================================================

/// Never started in most tests; exists so a cell can be created.
struct Idle;

#[async_trait]
impl Actor for Idle {
    async fn run(&mut self, _ctx: &mut ActorContext) -> RunResult {
        Ok(None)
    }
}

/// Receives forever until stopped.
struct LoopingRecv;

#[async_trait]
impl Actor for LoopingRecv {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
        loop {
            ctx.recv().await?;
        }
    }
}

/// Fails immediately.
struct Failing;

#[async_trait]
impl Actor for Failing {
    async fn run(&mut self, _ctx: &mut ActorContext) -> RunResult {
        Err(Fault::new("mock error").into())
    }
}

/// Returns a value.
struct ReturnsValue;

#[async_trait]
impl Actor for ReturnsValue {
    async fn run(&mut self, _ctx: &mut ActorContext) -> RunResult {
        Ok(Some(Msg::from(123i64)))
    }
}

/// Bumps a counter, awaits an external gate, bumps again.
struct Stepper {
    counter: Arc<AtomicU32>,
    gate: Option<oneshot::Receiver<()>>,
}

#[async_trait]
impl Actor for Stepper {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
        self.counter.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gate.take() {
            let _ = ctx.wait(gate).await?;
        }
        self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

/// Observes the stop signal before propagating it.
struct StopObserver {
    saw_stop: Arc<AtomicBool>,
}

#[async_trait]
impl Actor for StopObserver {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
        match ctx.recv().await {
            Err(RunError::Stopped(signal)) => {
                self.saw_stop.store(true, Ordering::SeqCst);
                Err(signal.into())
            }
            other => {
                other?;
                Ok(None)
            }
        }
    }
}

/// Swallows the stop signal and keeps the task alive unguarded.
struct Unstoppable;

#[async_trait]
impl Actor for Unstoppable {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
        let _ = ctx.recv().await;
        std::future::pending::<()>().await;
        Ok(None)
    }
}

/// Spawns one looping child, parks its handle, then receives forever.
struct ParentBody {
    child_slot: Arc<Mutex<Option<ActorHandle>>>,
}

#[async_trait]
impl Actor for ParentBody {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
        let child = ctx.spawn(LoopingRecv, "/child")?;
        *self.child_slot.lock().unwrap() = Some(child);
        loop {
            ctx.recv().await?;
        }
    }
}

/// Spawns a looping child, parks its handle, then fails. The child never
/// terminates on its own.
struct FailsWithChild {
    child_slot: Arc<Mutex<Option<ActorHandle>>>,
}

#[async_trait]
impl Actor for FailsWithChild {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
        let child = ctx.spawn(LoopingRecv, "/orphan")?;
        *self.child_slot.lock().unwrap() = Some(child);
        Err(Fault::new("mock error").into())
    }
}

/// Spawns a short-lived child and returns right away.
struct SpawnsSleeper;

struct Sleeper;

#[async_trait]
impl Actor for Sleeper {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
        ctx.sleep(Duration::from_secs(1)).await?;
        Ok(None)
    }
}

#[async_trait]
impl Actor for SpawnsSleeper {
    async fn run(&mut self, ctx: &mut ActorContext) -> RunResult {
        ctx.spawn(Sleeper, "/sleeper")?;
        Ok(None)
    }
}

// ============================================================================
// Messaging: connect / put / get
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_connect_and_put() {
    let actor = ActorHandle::create(Idle, "/a");
    let sink = ActorHandle::create(Idle, "/sink");
    actor.connect(sink.aref()).unwrap();

    actor.put(Msg::from("msg-1")).unwrap();
    let got = sink.get(None).unwrap().await;
    assert_eq!(got, vec![Msg::from("msg-1")]);
}

#[tokio::test(start_paused = true)]
async fn test_put_without_connect_is_no_route() {
    let actor = ActorHandle::create(Idle, "/a");
    assert!(matches!(
        actor.put(Msg::from("lost")),
        Err(ActorError::NoRoute)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_second_connect_is_rejected() {
    let actor = ActorHandle::create(Idle, "/a");
    let out = ActorHandle::create(Idle, "/out");
    actor.connect(out.aref()).unwrap();
    assert!(matches!(
        actor.connect(out.aref()),
        Err(ActorError::AlreadyConnected)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_second_get_is_busy_and_cancel_recovers() {
    let actor = ActorHandle::create(Idle, "/a");

    let pending = actor.get(None).unwrap();
    assert!(matches!(actor.get(None), Err(MailboxError::Busy)));

    drop(pending);
    // cancellation removed the waiter; a new receive may be installed
    let pending = actor.get(None).unwrap();
    actor.send(Msg::from("late"));
    assert_eq!(pending.await, vec![Msg::from("late")]);
}

#[tokio::test(start_paused = true)]
async fn test_fifo_among_messages_matching_same_pattern() {
    let actor = ActorHandle::create(Idle, "/a");
    actor.send(Msg::tuple([Msg::from("job"), Msg::from(1i64)]));
    actor.send(Msg::tuple([Msg::from("job"), Msg::from(2i64)]));

    let q = || tup([lit("job"), any()]);
    assert_eq!(actor.get(Some(q())).unwrap().await, vec![Msg::from(1i64)]);
    assert_eq!(actor.get(Some(q())).unwrap().await, vec![Msg::from(2i64)]);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_start_twice_is_an_error() {
    let actor = ActorHandle::create(LoopingRecv, "/a");
    actor.start().unwrap();
    assert!(matches!(actor.start(), Err(ActorError::AlreadyRunning)));
}

#[tokio::test(start_paused = true)]
async fn test_lifecycle_misuse_errors() {
    let actor = ActorHandle::create(LoopingRecv, "/a");
    assert!(matches!(actor.pause(), Err(ActorError::NotRunning)));
    assert!(matches!(actor.resume(), Err(ActorError::NotStarted)));
    assert!(matches!(actor.stop().await, Err(ActorError::NotStarted)));

    actor.start().unwrap();
    settle().await;
    assert!(matches!(actor.resume(), Err(ActorError::AlreadyRunning)));

    actor.stop().await.unwrap();
    assert_eq!(actor.state(), ActorState::Stopped);
    assert!(matches!(actor.stop().await, Err(ActorError::AlreadyStopped)));
    assert!(matches!(actor.resume(), Err(ActorError::AlreadyStopped)));
    assert!(matches!(actor.start(), Err(ActorError::AlreadyStopped)));
}

#[tokio::test(start_paused = true)]
async fn test_root_failure_is_reported_asynchronously() {
    let actor = ActorHandle::create(Failing, "/a");
    actor.start().unwrap();
    let reason = actor.wait_done().await;
    assert_eq!(reason, ExitReason::Failed(Fault::new("mock error")));
    assert_eq!(actor.state(), ActorState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stashes_result_until_resume() {
    let counter = Arc::new(AtomicU32::new(0));
    let (tx, rx) = oneshot::channel();
    let actor = ActorHandle::create(
        Stepper {
            counter: Arc::clone(&counter),
            gate: Some(rx),
        },
        "/a",
    );
    actor.start().unwrap();
    settle().await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    actor.pause().unwrap();
    tx.send(()).unwrap();
    settle().await;
    // the completed value was stashed, not delivered
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(actor.state(), ActorState::Paused);
    assert!(actor.is_alive());

    actor.resume().unwrap();
    settle().await;
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(actor.wait_done().await, ExitReason::Normal(None));
}

#[tokio::test(start_paused = true)]
async fn test_stop_injects_signal_into_body() {
    let saw_stop = Arc::new(AtomicBool::new(false));
    let actor = ActorHandle::create(
        StopObserver {
            saw_stop: Arc::clone(&saw_stop),
        },
        "/a",
    );
    actor.start().unwrap();
    settle().await;

    actor.stop().await.unwrap();
    assert!(saw_stop.load(Ordering::SeqCst));
    assert_eq!(actor.state(), ActorState::Stopped);
    assert_eq!(actor.wait_done().await, ExitReason::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_stop_while_paused() {
    let actor = ActorHandle::create(LoopingRecv, "/a");
    actor.start().unwrap();
    settle().await;
    actor.pause().unwrap();

    actor.stop().await.unwrap();
    assert_eq!(actor.state(), ActorState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_refusing_to_stop_is_reported() {
    let actor = ActorHandle::create(Unstoppable, "/a");
    actor.start().unwrap();
    settle().await;

    assert!(matches!(
        actor.stop().await,
        Err(ActorError::RefusedToStop)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_completion_waits_for_children() {
    let parent = ActorHandle::create(SpawnsSleeper, "/parent");
    parent.start().unwrap();
    // parent's body returns immediately, but the cell joins the sleeping
    // child before terminating (the paused clock advances on its own)
    let reason = parent.wait_done().await;
    assert_eq!(reason, ExitReason::Normal(None));
    assert!(parent.children().is_empty());
}

// ============================================================================
// Supervision
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_spawned_child_knows_its_parent() {
    let parent = ActorHandle::create(Idle, "/parent");
    assert!(parent.parent().is_none());

    let child = parent.spawn_child(LoopingRecv, "/child").unwrap();
    assert!(child.parent().unwrap().same_cell(&parent));
    assert_eq!(parent.children().len(), 1);
    child.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_child_failure_is_sent_to_parent() {
    let parent = ActorHandle::create(Idle, "/parent");
    let child = parent.spawn_child(Failing, "/child").unwrap();
    settle().await;

    let caps = parent
        .get(Some(tup([lit(EXIT), any(), kind(MsgKind::Fault)])))
        .unwrap()
        .await;
    assert_eq!(caps[0], Msg::Ref(child.aref()));
    assert_eq!(caps[1], Msg::Fault(Fault::new("mock error")));
    // the child unlinked itself before the exit message was delivered
    assert!(parent.children().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failing_actor_with_live_child_still_exits() {
    let child_slot = Arc::new(Mutex::new(None));
    let parent = ActorHandle::create(Idle, "/parent");
    let failing = parent
        .spawn_child(
            FailsWithChild {
                child_slot: Arc::clone(&child_slot),
            },
            "/failing",
        )
        .unwrap();
    settle().await;

    // the failure propagated even though the grandchild would never have
    // terminated by itself
    let caps = parent
        .get(Some(tup([lit(EXIT), any(), kind(MsgKind::Fault)])))
        .unwrap()
        .await;
    assert_eq!(caps[0], Msg::Ref(failing.aref()));
    assert_eq!(caps[1], Msg::Fault(Fault::new("mock error")));
    assert_eq!(failing.state(), ActorState::Stopped);

    // the live child was taken down, not awaited
    let child = child_slot.lock().unwrap().clone().unwrap();
    assert_eq!(child.state(), ActorState::Stopped);
    assert!(failing.children().is_empty());
    // exactly one exit message reached the parent
    assert_eq!(parent.mailbox_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stopped_child_reports_stopped_reason() {
    let parent = ActorHandle::create(Idle, "/parent");
    let child = parent.spawn_child(LoopingRecv, "/child").unwrap();
    settle().await;

    child.stop().await.unwrap();
    let caps = parent
        .get(Some(tup([lit(EXIT), any(), lit(Msg::Stopped)])))
        .unwrap()
        .await;
    assert_eq!(caps[0], Msg::Ref(child.aref()));
}

#[tokio::test(start_paused = true)]
async fn test_child_return_value_reaches_parent() {
    let parent = ActorHandle::create(Idle, "/parent");
    let child = parent.spawn_child(ReturnsValue, "/child").unwrap();
    settle().await;

    let caps = parent
        .get(Some(tup([lit(EXIT), any(), any()])))
        .unwrap()
        .await;
    assert_eq!(caps[0], Msg::Ref(child.aref()));
    assert_eq!(caps[1], Msg::from(123i64));
}

#[tokio::test(start_paused = true)]
async fn test_exactly_one_exit_per_child() {
    let parent = ActorHandle::create(Idle, "/parent");
    let _child = parent.spawn_child(Failing, "/child").unwrap();
    settle().await;

    let exit_pattern = || tup([lit(EXIT), any(), any()]);
    let first = parent.get(Some(exit_pattern())).unwrap();
    assert_eq!(first.await.len(), 2);
    // no second exit message lurking
    assert_eq!(parent.mailbox_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_pause_resume_stop_cascade_to_children() {
    let child_slot = Arc::new(Mutex::new(None));
    let parent = ActorHandle::create(
        ParentBody {
            child_slot: Arc::clone(&child_slot),
        },
        "/parent",
    );
    parent.start().unwrap();
    settle().await;
    let child = child_slot.lock().unwrap().clone().unwrap();
    assert_eq!(child.state(), ActorState::Running);

    parent.pause().unwrap();
    assert_eq!(child.state(), ActorState::Paused);

    parent.resume().unwrap();
    assert_eq!(child.state(), ActorState::Running);

    parent.stop().await.unwrap();
    assert_eq!(child.state(), ActorState::Stopped);
    assert_eq!(parent.state(), ActorState::Stopped);
}

// ============================================================================
// Stop signal plumbing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_signal_converts_into_stopped_reason() {
    // the StopSignal -> RunError conversion used by `?` in bodies
    fn fails_with(signal: StopSignal) -> RunError {
        signal.into()
    }
    assert!(matches!(
        fails_with(StopSignal),
        RunError::Stopped(StopSignal)
    ));
}
