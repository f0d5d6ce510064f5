use chrono::Local;

use crate::error::SampleError;
use crate::models::{CpuMetrics, GpuMetrics, MemoryMetrics, MetricsSnapshot};

/// Aggregate CPU/memory/GPU readings.
pub trait MetricsSource: Send {
    fn cpu(&mut self) -> Result<CpuMetrics, SampleError>;
    fn memory(&mut self) -> Result<MemoryMetrics, SampleError>;
    /// `None` when this machine has no GPU reader.
    fn gpu(&mut self) -> Option<GpuMetrics>;
}

/// Folds one round of readings into a [`MetricsSnapshot`].
pub struct MetricsSampler<S> {
    source: S,
}

impl<S: MetricsSource> MetricsSampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn sample(&mut self) -> Result<MetricsSnapshot, SampleError> {
        let cpu = self.source.cpu()?;
        let memory = self.source.memory()?;
        let gpu = self.source.gpu();
        Ok(MetricsSnapshot {
            cpu,
            memory,
            gpu,
            captured_at: Local::now(),
        })
    }
}
