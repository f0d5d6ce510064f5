//! Process and system sampling.

mod driver;
mod metrics;
mod sampler;
mod system;

pub use driver::SamplingDriver;
pub use metrics::{MetricsSampler, MetricsSource};
pub use sampler::{ProcessEntry, ProcessSampler, ProcessTable};
pub use system::{executable_path, SysinfoMetrics, SysinfoProcessTable};
