//! Shared snapshot store.
//!
//! One instance is created at startup and handed out as `Arc<SharedState>`
//! to the sampling driver, the action orchestrator, and the UI. Every write
//! stores under the lock, releases it, and only then posts to that stream's
//! mailbox, so a woken consumer always reads data at least as fresh as the
//! signal that woke it. Writes are stamped with a sequence number under the
//! lock; the mailbox uses it to discard posts that lost the race.

mod mailbox;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use mailbox::{mailbox, Mailbox, MailboxReceiver};

use crate::models::{MetricsSnapshot, ProcessInfo, ProcessSnapshot};

#[derive(Debug, Default)]
struct Stored {
    processes: ProcessSnapshot,
    metrics: Option<MetricsSnapshot>,
    ai_response: String,
    scan_response: String,
    selected_index: usize,
    seq: u64,
}

impl Stored {
    /// Stamp a write. Must be called with the write lock held.
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

#[derive(Debug)]
struct Notifiers {
    processes: Mailbox<ProcessSnapshot>,
    metrics: Mailbox<MetricsSnapshot>,
    ai_response: Mailbox<String>,
    scan_response: Mailbox<String>,
}

/// Consumer ends of the four update streams. Owned by the UI update loop.
#[derive(Debug)]
pub struct StateReceivers {
    pub processes: MailboxReceiver<ProcessSnapshot>,
    pub metrics: MailboxReceiver<MetricsSnapshot>,
    pub ai_response: MailboxReceiver<String>,
    pub scan_response: MailboxReceiver<String>,
}

#[derive(Debug)]
pub struct SharedState {
    inner: RwLock<Stored>,
    notify: Notifiers,
}

impl SharedState {
    pub fn new() -> (Arc<Self>, StateReceivers) {
        let (proc_tx, proc_rx) = mailbox();
        let (metrics_tx, metrics_rx) = mailbox();
        let (ai_tx, ai_rx) = mailbox();
        let (scan_tx, scan_rx) = mailbox();

        let state = Arc::new(Self {
            inner: RwLock::new(Stored::default()),
            notify: Notifiers {
                processes: proc_tx,
                metrics: metrics_tx,
                ai_response: ai_tx,
                scan_response: scan_tx,
            },
        });
        let receivers = StateReceivers {
            processes: proc_rx,
            metrics: metrics_rx,
            ai_response: ai_rx,
            scan_response: scan_rx,
        };
        (state, receivers)
    }

    fn read(&self) -> RwLockReadGuard<'_, Stored> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Stored> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Writers ──────────────────────────────────────────────────

    pub fn update_processes(&self, snapshot: ProcessSnapshot) {
        let seq = {
            let mut stored = self.write();
            stored.processes = snapshot.clone();
            stored.next_seq()
        };
        self.notify.processes.post(seq, snapshot);
    }

    pub fn update_metrics(&self, snapshot: MetricsSnapshot) {
        let seq = {
            let mut stored = self.write();
            stored.metrics = Some(snapshot.clone());
            stored.next_seq()
        };
        self.notify.metrics.post(seq, snapshot);
    }

    pub fn set_ai_response(&self, text: impl Into<String>) {
        let text = text.into();
        let seq = {
            let mut stored = self.write();
            stored.ai_response = text.clone();
            stored.next_seq()
        };
        self.notify.ai_response.post(seq, text);
    }

    pub fn set_scan_response(&self, text: impl Into<String>) {
        let text = text.into();
        let seq = {
            let mut stored = self.write();
            stored.scan_response = text.clone();
            stored.next_seq()
        };
        self.notify.scan_response.post(seq, text);
    }

    /// Stored as given; bounds are checked on read.
    pub fn set_selected_index(&self, index: usize) {
        self.write().selected_index = index;
    }

    // ── Readers ──────────────────────────────────────────────────

    pub fn processes(&self) -> ProcessSnapshot {
        self.read().processes.clone()
    }

    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        self.read().metrics.clone()
    }

    pub fn ai_response(&self) -> String {
        self.read().ai_response.clone()
    }

    pub fn scan_response(&self) -> String {
        self.read().scan_response.clone()
    }

    pub fn selected_index(&self) -> usize {
        self.read().selected_index
    }

    /// The selected process, or `None` if the list shrank past the selection.
    pub fn selected_process(&self) -> Option<ProcessInfo> {
        let stored = self.read();
        stored.processes.get(stored.selected_index).cloned()
    }
}
