use std::fmt;

use crate::constants::HIGH_THREAT_MALICIOUS_PCT;

/// One antivirus engine that flagged the executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub engine: String,
    pub result: String,
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.engine, self.result)
    }
}

/// Coarse verdict derived from the engine category counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatLevel {
    Unknown,
    Safe,
    Medium,
    High,
}

impl ThreatLevel {
    pub fn label(self) -> &'static str {
        match self {
            ThreatLevel::Unknown => "UNKNOWN",
            ThreatLevel::Safe => "SAFE",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
        }
    }

    /// Markup color tag used in panel text.
    pub fn color(self) -> &'static str {
        match self {
            ThreatLevel::Unknown => "white",
            ThreatLevel::Safe => "green",
            ThreatLevel::Medium => "yellow",
            ThreatLevel::High => "red",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ThreatLevel::Unknown => "?",
            ThreatLevel::Safe => "✓",
            ThreatLevel::Medium => "⚡",
            ThreatLevel::High => "⚠",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of looking up a process executable's hash with the scan service.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub process_name: String,
    pub pid: u32,
    pub file_path: String,
    pub sha256: String,
    pub malicious: u32,
    pub suspicious: u32,
    pub harmless: u32,
    pub undetected: u32,
    /// Engines that reported `malicious` or `suspicious`, sorted by engine name.
    pub detections: Vec<Detection>,
}

impl ScanReport {
    /// Counts come from remote JSON, so sum in a wider type.
    pub fn total_engines(&self) -> u64 {
        [self.malicious, self.suspicious, self.harmless, self.undetected]
            .iter()
            .map(|&n| u64::from(n))
            .sum()
    }

    pub fn detected_engines(&self) -> u64 {
        u64::from(self.malicious) + u64::from(self.suspicious)
    }

    pub fn threat_level(&self) -> ThreatLevel {
        let total = self.total_engines();
        if total == 0 {
            return ThreatLevel::Unknown;
        }
        let malicious_pct = self.malicious as f64 / total as f64 * 100.0;
        if malicious_pct >= HIGH_THREAT_MALICIOUS_PCT {
            ThreatLevel::High
        } else if self.malicious > 0 || self.suspicious > 0 {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Safe
        }
    }

    pub fn summary(&self) -> String {
        let total = self.total_engines();
        if total == 0 {
            return "No scan data available".to_string();
        }
        if self.malicious == 0 && self.suspicious == 0 {
            return format!("Clean - No threats detected by {} engines", total);
        }
        if self.malicious > 0 {
            return format!("Malicious - {}/{} engines detected threats", self.malicious, total);
        }
        format!(
            "Suspicious - {}/{} engines flagged as suspicious",
            self.suspicious, total
        )
    }

    /// First `n` detections, for prompts and the result panel.
    pub fn top_detections(&self, n: usize) -> &[Detection] {
        &self.detections[..self.detections.len().min(n)]
    }
}
