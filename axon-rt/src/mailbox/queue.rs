//! The mailbox queue and its cancel-safe receive future.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::sync::oneshot;

// Layer 3: Internal module imports
use super::MailboxError;
use crate::message::Msg;
use crate::pattern::{any, matches, Pattern};

/// What a completed waiter hands over: the claimed message and the values
/// its pattern captured. The message rides along so a cancelled receive
/// can put it back.
#[derive(Debug)]
struct Delivered {
    msg: Msg,
    captures: Vec<Msg>,
}

struct Waiter {
    id: u64,
    pattern: Pattern,
    tx: oneshot::Sender<Delivered>,
}

#[derive(Default)]
struct MailboxInner {
    queue: VecDeque<Msg>,
    waiter: Option<Waiter>,
    next_receive_id: u64,
}

/// FIFO of messages plus at most one pattern-filtered waiter.
///
/// Messages are delivered to waiters in FIFO order modulo pattern
/// selectivity: a receive may skip earlier non-matching messages and take
/// a later matching one; skipped messages stay queued for the next
/// receive.
#[derive(Default)]
pub struct Mailbox {
    inner: Mutex<MailboxInner>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, or complete the pending waiter if its pattern
    /// matches (in which case the message is not enqueued).
    pub fn deliver(&self, msg: Msg) {
        let mut inner = self.inner.lock();
        if let Some(waiter) = inner.waiter.take() {
            match matches(&waiter.pattern, &msg) {
                Some(captures) => {
                    if let Err(returned) = waiter.tx.send(Delivered { msg, captures }) {
                        // Receiver was dropped before its guard ran; the
                        // waiter is gone but the message must survive.
                        inner.queue.push_back(returned.msg);
                    }
                    return;
                }
                None => inner.waiter = Some(waiter),
            }
        }
        inner.queue.push_back(msg);
    }

    /// Receive the first queued message matching `pattern`, or wait for
    /// one. `None` selects the front of the queue (match-anything).
    ///
    /// Resolves to the captured values of the match; with `None` / a
    /// match-anything pattern that is the message itself as the single
    /// capture.
    pub fn recv(&self, pattern: Option<Pattern>) -> Result<Receive<'_>, MailboxError> {
        let pattern = pattern.unwrap_or_else(any);
        let mut inner = self.inner.lock();

        let mut found = None;
        for (index, queued) in inner.queue.iter().enumerate() {
            if let Some(captures) = matches(&pattern, queued) {
                found = Some((index, captures));
                break;
            }
        }
        if let Some((index, captures)) = found {
            if let Some(msg) = inner.queue.remove(index) {
                return Ok(Receive {
                    mailbox: self,
                    state: ReceiveState::Ready(Some(Delivered { msg, captures })),
                });
            }
        }

        if inner.waiter.is_some() {
            return Err(MailboxError::Busy);
        }
        let id = inner.next_receive_id;
        inner.next_receive_id += 1;
        let (tx, rx) = oneshot::channel();
        inner.waiter = Some(Waiter { id, pattern, tx });
        Ok(Receive {
            mailbox: self,
            state: ReceiveState::Waiting {
                id,
                rx,
                completed: false,
            },
        })
    }

    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().queue.is_empty()
    }

    pub fn has_waiter(&self) -> bool {
        self.inner.lock().waiter.is_some()
    }

    fn cancel(&self, id: u64, rx: &mut oneshot::Receiver<Delivered>) {
        let mut inner = self.inner.lock();
        if inner.waiter.as_ref().is_some_and(|w| w.id == id) {
            inner.waiter = None;
        }
        // The waiter may have fired between completion and this guard
        // running; reclaim the message it captured.
        if let Ok(delivered) = rx.try_recv() {
            inner.queue.push_front(delivered.msg);
        }
    }

    fn requeue_front(&self, msg: Msg) {
        self.inner.lock().queue.push_front(msg);
    }
}

enum ReceiveState {
    Ready(Option<Delivered>),
    Waiting {
        id: u64,
        rx: oneshot::Receiver<Delivered>,
        completed: bool,
    },
}

/// A pending pattern-filtered receive. Dropping it removes the waiter
/// idempotently; an already-claimed message is requeued at the front.
pub struct Receive<'a> {
    mailbox: &'a Mailbox,
    state: ReceiveState,
}

impl Future for Receive<'_> {
    type Output = Vec<Msg>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            ReceiveState::Ready(slot) => match slot.take() {
                Some(delivered) => Poll::Ready(delivered.captures),
                None => Poll::Pending,
            },
            ReceiveState::Waiting { rx, completed, .. } => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(delivered)) => {
                    *completed = true;
                    Poll::Ready(delivered.captures)
                }
                // The mailbox owning the sender is still alive for as long
                // as this borrow exists, so the channel cannot close early.
                Poll::Ready(Err(_)) => Poll::Pending,
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

impl Drop for Receive<'_> {
    fn drop(&mut self) {
        match &mut self.state {
            ReceiveState::Ready(slot) => {
                if let Some(delivered) = slot.take() {
                    self.mailbox.requeue_front(delivered.msg);
                }
            }
            ReceiveState::Waiting { id, rx, completed } => {
                if !*completed {
                    self.mailbox.cancel(*id, rx);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests are allowed to use unwrap for simplicity
mod tests {
    use super::*;
    use crate::pattern::{lit, tup};

    #[tokio::test]
    async fn test_deliver_then_receive() {
        let mailbox = Mailbox::new();
        mailbox.deliver(Msg::from("msg-1"));
        let got = mailbox.recv(None).unwrap().await;
        assert_eq!(got, vec![Msg::from("msg-1")]);
        assert!(mailbox.is_empty());
    }

    #[tokio::test]
    async fn test_receive_completes_on_deliver() {
        let mailbox = Mailbox::new();
        let pending = mailbox.recv(None).unwrap();
        mailbox.deliver(Msg::from("late"));
        assert_eq!(pending.await, vec![Msg::from("late")]);
        // completed without ever touching the queue
        assert!(mailbox.is_empty());
    }

    #[tokio::test]
    async fn test_pattern_skips_non_matching() {
        let mailbox = Mailbox::new();
        mailbox.deliver(Msg::from("noise"));
        mailbox.deliver(Msg::tuple([Msg::from("chunk"), Msg::from(1i64)]));

        let got = mailbox
            .recv(Some(tup([lit("chunk"), crate::pattern::any()])))
            .unwrap()
            .await;
        assert_eq!(got, vec![Msg::from(1i64)]);
        // the skipped message is still there for the next receive
        assert_eq!(mailbox.len(), 1);
        let next = mailbox.recv(None).unwrap().await;
        assert_eq!(next, vec![Msg::from("noise")]);
    }

    #[tokio::test]
    async fn test_fifo_among_matching() {
        let mailbox = Mailbox::new();
        mailbox.deliver(Msg::from("m1"));
        mailbox.deliver(Msg::from("m2"));
        let first = mailbox.recv(None).unwrap().await;
        let second = mailbox.recv(None).unwrap().await;
        assert_eq!(first, vec![Msg::from("m1")]);
        assert_eq!(second, vec![Msg::from("m2")]);
    }

    #[tokio::test]
    async fn test_second_waiter_is_busy() {
        let mailbox = Mailbox::new();
        let _pending = mailbox.recv(None).unwrap();
        assert_eq!(mailbox.recv(None).err(), Some(MailboxError::Busy));
    }

    #[tokio::test]
    async fn test_cancel_removes_waiter() {
        let mailbox = Mailbox::new();
        let pending = mailbox.recv(None).unwrap();
        drop(pending);
        assert!(!mailbox.has_waiter());
        // a new receive may now be installed
        let _pending = mailbox.recv(None).unwrap();
    }

    #[tokio::test]
    async fn test_non_matching_deliver_leaves_waiter() {
        let mailbox = Mailbox::new();
        let pending = mailbox.recv(Some(lit("wanted"))).unwrap();
        mailbox.deliver(Msg::from("unwanted"));
        assert_eq!(mailbox.len(), 1);
        mailbox.deliver(Msg::from("wanted"));
        assert_eq!(pending.await, vec![]);
        assert_eq!(mailbox.len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_ready_receive_requeues() {
        let mailbox = Mailbox::new();
        mailbox.deliver(Msg::from("keep-me"));
        let ready = mailbox.recv(None).unwrap();
        drop(ready);
        assert_eq!(mailbox.len(), 1);
        assert_eq!(mailbox.recv(None).unwrap().await, vec![Msg::from("keep-me")]);
    }
}
