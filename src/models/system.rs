use chrono::{DateTime, Local};

/// System-wide resource snapshot, produced once per sampling tick.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    /// None when no GPU reader exists on this machine. Not an error.
    pub gpu: Option<GpuMetrics>,
    pub captured_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuMetrics {
    pub usage_percent: f32,
    pub core_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryMetrics {
    pub used_gb: f64,
    pub total_gb: f64,
    pub percent: f32,
}

impl MemoryMetrics {
    /// Build from raw byte counts.
    pub fn from_bytes(used: u64, total: u64) -> Self {
        const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
        let percent = if total == 0 {
            0.0
        } else {
            (used as f64 / total as f64 * 100.0) as f32
        };
        Self {
            used_gb: used as f64 / GIB,
            total_gb: total as f64 / GIB,
            percent,
        }
    }
}

/// GPU snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuMetrics {
    /// False when a device was found but its readings could not be taken.
    pub available: bool,
    pub name: String,
    pub usage_percent: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
}

impl GpuMetrics {
    pub fn memory_percent(&self) -> f32 {
        if self.memory_total_mb == 0 {
            return 0.0;
        }
        (self.memory_used_mb as f32 / self.memory_total_mb as f32) * 100.0
    }

    /// "3.2GB" style for large cards, "512MB" for small ones.
    pub fn memory_display(&self) -> (String, String) {
        if self.memory_total_mb >= 1024 {
            (
                format!("{:.1}GB", self.memory_used_mb as f64 / 1024.0),
                format!("{:.1}GB", self.memory_total_mb as f64 / 1024.0),
            )
        } else {
            (
                format!("{}MB", self.memory_used_mb),
                format!("{}MB", self.memory_total_mb),
            )
        }
    }
}
