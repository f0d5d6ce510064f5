//! Periodic sampling thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::runtime;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::metrics::{MetricsSampler, MetricsSource};
use super::sampler::{ProcessSampler, ProcessTable};
use crate::state::SharedState;

pub struct SamplingDriver<T, M> {
    processes: ProcessSampler<T>,
    metrics: MetricsSampler<M>,
    state: Arc<SharedState>,
    interval: Duration,
}

impl<T, M> SamplingDriver<T, M>
where
    T: ProcessTable + 'static,
    M: MetricsSource + 'static,
{
    pub fn new(
        processes: ProcessSampler<T>,
        metrics: MetricsSampler<M>,
        state: Arc<SharedState>,
        interval: Duration,
    ) -> Self {
        Self {
            processes,
            metrics,
            state,
            interval,
        }
    }

    /// Sample once and publish whatever succeeded.
    pub fn tick(&mut self) {
        match self.processes.sample() {
            Ok(snapshot) => {
                debug!(
                    count = snapshot.len(),
                    baselines = self.processes.baseline_count(),
                    "process sample"
                );
                self.state.update_processes(snapshot);
            }
            Err(e) => warn!("process sampling failed: {}", e),
        }
        match self.metrics.sample() {
            Ok(snapshot) => self.state.update_metrics(snapshot),
            Err(e) => warn!("metrics sampling failed: {}", e),
        }
    }

    /// Run on a dedicated thread until `cancel` flips to true or its sender
    /// is dropped. The thread drives its own single-threaded runtime.
    pub fn spawn(self, cancel: watch::Receiver<bool>) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new().name("sampler".into()).spawn(move || {
            match runtime::Builder::new_current_thread().enable_time().build() {
                Ok(rt) => rt.block_on(self.run(cancel)),
                Err(e) => error!("sampler runtime failed to start: {}", e),
            }
        })
    }

    async fn run(mut self, mut cancel: watch::Receiver<bool>) {
        info!(interval_ms = self.interval.as_millis() as u64, "sampler started");
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !*cancel.borrow() {
            tokio::select! {
                biased;
                changed = cancel.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => self.tick(),
            }
        }
        info!("sampler stopped");
    }
}
