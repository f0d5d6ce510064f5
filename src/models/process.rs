use std::sync::Arc;

/// A single process as shown in the process list.
/// Immutable once sampled; CPU percent is relative to the previous tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_bytes: u64,
    pub memory_percent: f32,
    pub owner: String,
    pub command_line: String,
}

impl ProcessInfo {
    /// Resident memory in whole MiB.
    pub fn memory_mb(&self) -> u64 {
        self.memory_bytes / 1024 / 1024
    }
}

/// Ranked, capped, immutable process list.
///
/// Cloning is cheap (shared slice), so readers always hold a complete
/// snapshot even if a newer one is stored right after.
#[derive(Debug, Clone)]
pub struct ProcessSnapshot {
    entries: Arc<[ProcessInfo]>,
}

impl ProcessSnapshot {
    /// Sort descending by CPU percent and keep the first `cap` entries.
    pub fn ranked(mut entries: Vec<ProcessInfo>, cap: usize) -> Self {
        entries.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
        entries.truncate(cap);
        Self {
            entries: entries.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProcessInfo> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessInfo> {
        self.entries.iter()
    }
}

impl Default for ProcessSnapshot {
    fn default() -> Self {
        Self {
            entries: Vec::new().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc_with_cpu(pid: u32, cpu: f32) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: format!("proc{}", pid),
            cpu_percent: cpu,
            memory_bytes: 0,
            memory_percent: 0.0,
            owner: "root".to_string(),
            command_line: String::new(),
        }
    }

    #[test]
    fn ranked_sorts_descending_and_caps() {
        let entries = (0..150).map(|i| proc_with_cpu(i, i as f32 * 0.5)).collect();
        let snap = ProcessSnapshot::ranked(entries, 100);

        assert_eq!(snap.len(), 100);
        assert_eq!(snap.get(0).map(|p| p.pid), Some(149));
        let cpus: Vec<f32> = snap.iter().map(|p| p.cpu_percent).collect();
        assert!(cpus.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn ranked_keeps_short_lists_whole() {
        let snap = ProcessSnapshot::ranked(vec![proc_with_cpu(1, 3.0), proc_with_cpu(2, 9.0)], 100);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get(0).map(|p| p.pid), Some(2));
        assert!(snap.get(2).is_none());
    }

    #[test]
    fn default_snapshot_is_empty() {
        assert!(ProcessSnapshot::default().is_empty());
    }

    #[test]
    fn memory_mb_rounds_down() {
        let mut p = proc_with_cpu(1, 0.0);
        p.memory_bytes = 3 * 1024 * 1024 + 512;
        assert_eq!(p.memory_mb(), 3);
    }
}
