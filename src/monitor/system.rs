//! sysinfo/NVML-backed implementations of the sampling collaborators.

#[cfg(not(target_os = "linux"))]
use std::collections::HashMap;
use std::path::PathBuf;
#[cfg(not(target_os = "linux"))]
use std::time::Instant;
use std::time::Duration;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};
use tracing::{info, warn};

use super::metrics::MetricsSource;
use super::sampler::{ProcessEntry, ProcessTable};
use crate::error::SampleError;
use crate::models::{CpuMetrics, GpuMetrics, MemoryMetrics};

fn process_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing()
        .with_cpu()
        .with_memory()
        .with_user(UpdateKind::OnlyIfNotSet)
        .with_cmd(UpdateKind::OnlyIfNotSet)
}

/// Kernel USER_HZ. `/proc/<pid>/stat` reports CPU time in these ticks.
#[cfg(any(target_os = "linux", test))]
const USER_HZ: u64 = 100;

/// Cumulative user + system CPU time from the body of `/proc/<pid>/stat`.
#[cfg(any(target_os = "linux", test))]
fn parse_stat_cpu_time(stat: &str) -> Option<Duration> {
    // comm may contain spaces and parens; fields resume after the last ')'
    let rpar = stat.rfind(')')?;
    let mut fields = stat.get(rpar + 2..)?.split_whitespace();
    // utime is the 11th field after state, stime the 12th
    let utime = fields.nth(11)?.parse::<u64>().ok()?;
    let stime = fields.next()?.parse::<u64>().ok()?;
    let ticks = utime.saturating_add(stime);
    Some(Duration::from_millis(ticks.saturating_mul(1000) / USER_HZ))
}

fn owner_of(users: &Users, process: &sysinfo::Process) -> Option<String> {
    let uid = process.user_id()?;
    Some(
        users
            .get_user_by_id(uid)
            .map(|u| u.name().to_string())
            // Fallback to numeric UID if username not found
            .unwrap_or_else(|| uid.to_string()),
    )
}

/// Live process table read through sysinfo.
///
/// On Linux cumulative CPU time comes from `/proc`. Elsewhere it is
/// integrated from sysinfo's per-refresh usage, starting at zero when a
/// pid is first seen.
pub struct SysinfoProcessTable {
    sys: System,
    users: Users,
    #[cfg(not(target_os = "linux"))]
    integrated: HashMap<u32, Duration>,
    #[cfg(not(target_os = "linux"))]
    last_refresh: Option<Instant>,
    #[cfg(not(target_os = "linux"))]
    pass_elapsed: Duration,
}

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self {
            sys: System::new(),
            users: Users::new_with_refreshed_list(),
            #[cfg(not(target_os = "linux"))]
            integrated: HashMap::new(),
            #[cfg(not(target_os = "linux"))]
            last_refresh: None,
            #[cfg(not(target_os = "linux"))]
            pass_elapsed: Duration::ZERO,
        }
    }

    #[cfg(target_os = "linux")]
    fn begin_cpu_pass(&mut self) {}

    #[cfg(target_os = "linux")]
    fn cpu_time(&mut self, pid: u32, _usage: f32) -> Option<Duration> {
        let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
        parse_stat_cpu_time(&stat)
    }

    #[cfg(not(target_os = "linux"))]
    fn begin_cpu_pass(&mut self) {
        let now = Instant::now();
        self.pass_elapsed = self
            .last_refresh
            .map(|prev| now.duration_since(prev))
            .unwrap_or_default();
        self.last_refresh = Some(now);
        let live = &self.sys;
        self.integrated
            .retain(|pid, _| live.process(Pid::from_u32(*pid)).is_some());
    }

    #[cfg(not(target_os = "linux"))]
    fn cpu_time(&mut self, pid: u32, usage: f32) -> Option<Duration> {
        let spent = self.pass_elapsed.mul_f32(usage.max(0.0) / 100.0);
        let total = self.integrated.entry(pid).or_default();
        *total += spent;
        Some(*total)
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn enumerate(&mut self) -> Result<Vec<ProcessEntry>, SampleError> {
        self.sys.refresh_memory();
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            process_refresh_kind(),
        );

        let total_memory = self.sys.total_memory();
        if self.sys.processes().is_empty() {
            return Err(SampleError::Enumeration(
                "process table is empty or unreadable".into(),
            ));
        }

        self.begin_cpu_pass();
        let rows: Vec<(ProcessEntry, f32)> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                let name = process.name().to_string_lossy().to_string();
                let cmd: Vec<String> = process
                    .cmd()
                    .iter()
                    .map(|s| s.to_string_lossy().to_string())
                    .collect();
                let memory = process.memory();
                let entry = ProcessEntry {
                    pid: pid.as_u32(),
                    name: (!name.is_empty()).then_some(name),
                    cpu_time: None,
                    run_time: Duration::from_secs(process.run_time()),
                    memory_bytes: Some(memory),
                    memory_percent: (total_memory > 0)
                        .then(|| (memory as f64 / total_memory as f64 * 100.0) as f32),
                    owner: owner_of(&self.users, process),
                    command_line: (!cmd.is_empty()).then(|| cmd.join(" ")),
                };
                (entry, process.cpu_usage())
            })
            .collect();

        // A pid that exited between the refresh and the /proc read keeps
        // `cpu_time: None` and is dropped by the sampler.
        let entries = rows
            .into_iter()
            .map(|(mut entry, usage)| {
                entry.cpu_time = self.cpu_time(entry.pid, usage);
                entry
            })
            .collect();
        Ok(entries)
    }

    fn kill(&mut self, pid: u32) -> bool {
        let pid = Pid::from_u32(pid);
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing(),
        );
        match self.sys.process(pid) {
            Some(process) => process.kill(),
            None => false,
        }
    }
}

/// Resolve the on-disk executable of a live process.
pub fn executable_path(pid: u32) -> Result<PathBuf, String> {
    let pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_exe(UpdateKind::Always),
    );
    let process = sys.process(pid).ok_or_else(|| "process not found".to_string())?;
    process
        .exe()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| "executable path not readable".to_string())
}

/// Aggregate CPU/memory through sysinfo, GPU through NVML when present.
pub struct SysinfoMetrics {
    sys: System,
    /// NVML handle (None if NVML not available)
    nvml: Option<nvml_wrapper::Nvml>,
}

impl SysinfoMetrics {
    pub fn new() -> Self {
        let mut sys = System::new();
        // Prime the CPU counters so the first reading has something to diff against.
        sys.refresh_cpu_usage();

        let nvml = match nvml_wrapper::Nvml::init() {
            Ok(nvml) => Some(nvml),
            Err(e) => {
                info!("NVML unavailable, GPU metrics disabled: {}", e);
                None
            }
        };
        Self { sys, nvml }
    }
}

impl MetricsSource for SysinfoMetrics {
    fn cpu(&mut self) -> Result<CpuMetrics, SampleError> {
        self.sys.refresh_cpu_usage();
        let core_count = self.sys.cpus().len();
        if core_count == 0 {
            return Err(SampleError::Metrics("no CPUs reported".into()));
        }
        Ok(CpuMetrics {
            usage_percent: self.sys.global_cpu_usage(),
            core_count,
        })
    }

    fn memory(&mut self) -> Result<MemoryMetrics, SampleError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(SampleError::Metrics("total memory reported as zero".into()));
        }
        Ok(MemoryMetrics::from_bytes(self.sys.used_memory(), total))
    }

    fn gpu(&mut self) -> Option<GpuMetrics> {
        let nvml = self.nvml.as_ref()?;
        let device = match nvml.device_by_index(0) {
            Ok(device) => device,
            Err(e) => {
                warn!("NVML device 0 unavailable: {}", e);
                return None;
            }
        };

        let name = device.name().unwrap_or_else(|_| "NVIDIA GPU".to_string());
        match (device.utilization_rates(), device.memory_info()) {
            (Ok(util), Ok(mem)) => Some(GpuMetrics {
                available: true,
                name,
                usage_percent: util.gpu as f32,
                memory_used_mb: mem.used / 1024 / 1024,
                memory_total_mb: mem.total / 1024 / 1024,
            }),
            _ => Some(GpuMetrics {
                available: false,
                name,
                usage_percent: 0.0,
                memory_used_mb: 0,
                memory_total_mb: 0,
            }),
        }
    }
}
