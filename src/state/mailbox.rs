//! Single-slot "latest value wins" mailbox.
//!
//! A value cell paired with a depth-1 signal channel. Posting overwrites the
//! cell and tries to raise the signal; if a signal is already pending the new
//! one is dropped, so the consumer wakes once and reads whatever is newest.
//!
//! Each post carries the sequence number its write was stamped with. Posts
//! can arrive out of order when writers race between storing and posting, so
//! the cell only accepts a sequence higher than any it has seen.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

#[derive(Debug)]
struct Slot<T> {
    /// Highest sequence accepted so far, delivered or not.
    seq: u64,
    value: Option<T>,
}

/// Producer half. Cloneable; never blocks.
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Arc<Mutex<Slot<T>>>,
    signal: mpsc::Sender<()>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            signal: self.signal.clone(),
        }
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct MailboxReceiver<T> {
    slot: Arc<Mutex<Slot<T>>>,
    signal: mpsc::Receiver<()>,
}

pub fn mailbox<T>() -> (Mailbox<T>, MailboxReceiver<T>) {
    let slot = Arc::new(Mutex::new(Slot {
        seq: 0,
        value: None,
    }));
    let (tx, rx) = mpsc::channel(1);
    (
        Mailbox {
            slot: Arc::clone(&slot),
            signal: tx,
        },
        MailboxReceiver { slot, signal: rx },
    )
}

impl<T> Mailbox<T> {
    /// Replace the pending value and raise the signal if none is pending.
    ///
    /// A post whose `seq` is not newer than the last accepted one is dropped.
    pub fn post(&self, seq: u64, value: T) {
        {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            if seq <= slot.seq {
                return;
            }
            slot.seq = seq;
            slot.value = Some(value);
        }
        // Full: a wake-up is already queued. Closed: nobody is listening.
        let _ = self.signal.try_send(());
    }
}

impl<T> MailboxReceiver<T> {
    /// Wait for the next value. `None` once every producer is gone.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            self.signal.recv().await?;
            if let Some(value) = self.take() {
                return Some(value);
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.signal.try_recv() {
                Ok(()) => {
                    if let Some(value) = self.take() {
                        return Some(value);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    fn take(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_on_full_channel_keeps_latest() {
        let (tx, mut rx) = mailbox();
        tx.post(1, 1);
        tx.post(2, 2);
        tx.post(3, 3);

        assert_eq!(rx.try_recv(), Some(3));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn post_without_receiver_does_not_fail() {
        let (tx, rx) = mailbox();
        drop(rx);
        tx.post(1, "ignored");
    }

    #[tokio::test]
    async fn recv_wakes_on_post() {
        let (tx, mut rx) = mailbox();
        let producer = tx.clone();
        tokio::spawn(async move {
            producer.post(1, 7u32);
        });
        assert_eq!(rx.recv().await, Some(7));
    }

    #[tokio::test]
    async fn recv_ends_when_producers_dropped() {
        let (tx, mut rx) = mailbox::<u8>();
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn value_posted_after_drain_is_delivered() {
        let (tx, mut rx) = mailbox();
        tx.post(1, "a");
        assert_eq!(rx.try_recv(), Some("a"));
        tx.post(2, "b");
        assert_eq!(rx.try_recv(), Some("b"));
    }

    // ── out-of-order posts ──

    #[test]
    fn older_post_does_not_replace_newer_pending_value() {
        let (tx, mut rx) = mailbox();
        tx.post(2, "newer");
        tx.post(1, "older");
        assert_eq!(rx.try_recv(), Some("newer"));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn older_post_after_delivery_raises_no_signal() {
        let (tx, mut rx) = mailbox();
        tx.post(5, "newer");
        assert_eq!(rx.try_recv(), Some("newer"));
        tx.post(4, "older");
        assert_eq!(rx.try_recv(), None);
    }
}
