//! Single consumer of the shared-state update streams.

use tokio::sync::watch;

use crate::models::{MetricsSnapshot, ProcessSnapshot};
use crate::state::StateReceivers;

/// One drained update, applied to the view on the UI task.
#[derive(Debug)]
pub enum Update {
    Processes(ProcessSnapshot),
    Metrics(MetricsSnapshot),
    AiResponse(String),
    ScanResponse(String),
}

pub struct UpdateLoop {
    receivers: StateReceivers,
    cancel: watch::Receiver<bool>,
}

impl UpdateLoop {
    pub fn new(receivers: StateReceivers, cancel: watch::Receiver<bool>) -> Self {
        Self { receivers, cancel }
    }

    /// Wait for whichever stream is ready first.
    ///
    /// Returns `None` once cancellation is signalled (or every producer is
    /// gone); after that the loop consumes nothing further.
    pub async fn next(&mut self) -> Option<Update> {
        if *self.cancel.borrow() {
            return None;
        }
        let r = &mut self.receivers;
        tokio::select! {
            biased;
            changed = self.cancel.changed() => {
                // A dropped sender also ends the loop.
                let _ = changed;
                None
            }
            Some(p) = r.processes.recv() => Some(Update::Processes(p)),
            Some(m) = r.metrics.recv() => Some(Update::Metrics(m)),
            Some(t) = r.ai_response.recv() => Some(Update::AiResponse(t)),
            Some(t) = r.scan_response.recv() => Some(Update::ScanResponse(t)),
            else => None,
        }
    }
}
