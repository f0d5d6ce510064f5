//! Per-process CPU sampler with a baseline cache.
//!
//! CPU percent is the cumulative CPU-time delta since the previous tick divided
//! by the wall-clock delta. A pid seen for the first time has no baseline, so
//! its percent is averaged over the process lifetime instead and usually reads
//! low until the next tick.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::constants::CACHE_CLEANUP_INTERVAL;
use crate::error::SampleError;
use crate::models::{ProcessInfo, ProcessSnapshot};

/// One row of the OS process table. Fields the OS refused to give us are `None`.
#[derive(Debug, Clone, Default)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: Option<String>,
    /// Cumulative CPU time across all cores.
    pub cpu_time: Option<Duration>,
    /// Time since the process started.
    pub run_time: Duration,
    pub memory_bytes: Option<u64>,
    pub memory_percent: Option<f32>,
    pub owner: Option<String>,
    pub command_line: Option<String>,
}

/// OS process enumeration.
pub trait ProcessTable: Send {
    /// Enumerate every live process. Errors only when the table itself is unreadable.
    fn enumerate(&mut self) -> Result<Vec<ProcessEntry>, SampleError>;

    /// Send a termination signal. Returns whether the signal was delivered.
    fn kill(&mut self, pid: u32) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct CpuBaseline {
    cpu_time: Duration,
    taken_at: Instant,
}

pub struct ProcessSampler<T> {
    table: T,
    baselines: HashMap<u32, CpuBaseline>,
    last_cleanup: Instant,
    max_processes: usize,
}

impl<T: ProcessTable> ProcessSampler<T> {
    pub fn new(table: T, max_processes: usize) -> Self {
        Self {
            table,
            baselines: HashMap::new(),
            last_cleanup: Instant::now(),
            max_processes: max_processes.max(1),
        }
    }

    pub fn sample(&mut self) -> Result<ProcessSnapshot, SampleError> {
        self.sample_at(Instant::now())
    }

    /// Sample with an explicit clock reading.
    pub fn sample_at(&mut self, now: Instant) -> Result<ProcessSnapshot, SampleError> {
        let entries = self.table.enumerate()?;

        if now.saturating_duration_since(self.last_cleanup) >= CACHE_CLEANUP_INTERVAL {
            self.evict_missing(&entries);
            self.last_cleanup = now;
        }

        let mut processes = Vec::with_capacity(entries.len());
        for entry in entries {
            // Without CPU time there is nothing to rank on.
            let Some(cpu_time) = entry.cpu_time else {
                continue;
            };

            let cpu_percent = match self.baselines.get(&entry.pid) {
                Some(prev) => percent_of(
                    cpu_time.saturating_sub(prev.cpu_time),
                    now.saturating_duration_since(prev.taken_at),
                ),
                None => percent_of(cpu_time, entry.run_time),
            };
            self.baselines.insert(
                entry.pid,
                CpuBaseline {
                    cpu_time,
                    taken_at: now,
                },
            );

            processes.push(ProcessInfo {
                pid: entry.pid,
                name: entry.name.unwrap_or_default(),
                cpu_percent,
                memory_bytes: entry.memory_bytes.unwrap_or(0),
                memory_percent: entry.memory_percent.unwrap_or(0.0),
                owner: entry.owner.unwrap_or_default(),
                command_line: entry.command_line.unwrap_or_default(),
            });
        }

        Ok(ProcessSnapshot::ranked(processes, self.max_processes))
    }

    pub fn has_baseline(&self, pid: u32) -> bool {
        self.baselines.contains_key(&pid)
    }

    pub fn baseline_count(&self) -> usize {
        self.baselines.len()
    }

    fn evict_missing(&mut self, entries: &[ProcessEntry]) {
        let live: HashSet<u32> = entries.iter().map(|e| e.pid).collect();
        let before = self.baselines.len();
        self.baselines.retain(|pid, _| live.contains(pid));
        let evicted = before - self.baselines.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.baselines.len(), "purged stale CPU baselines");
        }
    }
}

fn percent_of(cpu: Duration, wall: Duration) -> f32 {
    let wall = wall.as_secs_f64();
    if wall <= 0.0 {
        return 0.0;
    }
    (cpu.as_secs_f64() / wall * 100.0) as f32
}
