//! Prompt construction for process and scan analysis.

use std::fmt::Write;

use crate::constants::MAX_TOP_DETECTIONS;
use crate::models::{ProcessInfo, ScanReport};

/// Single-process inspection prompt.
pub fn inspect_prompt(process: &ProcessInfo) -> String {
    format!(
        "You are a system process analyzer. Provide a concise analysis of the following process:\n\
         \n\
         Process Name: {name}\n\
         PID: {pid}\n\
         CPU Usage: {cpu:.1}%\n\
         Memory Usage: {mem}MB\n\
         Owner: {owner}\n\
         Command Line: {cmd}\n\
         \n\
         Please provide:\n\
         1. Purpose: What is this process and what does it do?\n\
         2. Safety: Is this process safe or potentially harmful?\n\
         3. Recommendation: Can this process be safely terminated?\n\
         \n\
         Keep the response clear, professional, and under 200 words.",
        name = process.name,
        pid = process.pid,
        cpu = process.cpu_percent,
        mem = process.memory_mb(),
        owner = or_unknown(&process.owner),
        cmd = or_unknown(&process.command_line),
    )
}

/// Follow-up prompt that feeds a scan report to the analyzer.
pub fn scan_prompt(process: &ProcessInfo, report: &ScanReport) -> String {
    let detections = report.top_detections(MAX_TOP_DETECTIONS);
    let detections_text = if detections.is_empty() {
        "None".to_string()
    } else {
        let mut s = String::new();
        for (i, d) in detections.iter().enumerate() {
            let _ = writeln!(s, "{}. {}", i + 1, d);
        }
        s
    };

    format!(
        "You are a cybersecurity analyst. Analyze the following VirusTotal scan result for a running process:\n\
         \n\
         Process Information:\n\
         - Name: {name}\n\
         - PID: {pid}\n\
         - CPU Usage: {cpu:.1}%\n\
         - Memory Usage: {mem}MB\n\
         - File Path: {path}\n\
         - File Hash (SHA256): {hash}\n\
         \n\
         VirusTotal Scan Results:\n\
         - Threat Level: {level}\n\
         - Malicious Detections: {malicious}\n\
         - Suspicious Detections: {suspicious}\n\
         - Harmless: {harmless}\n\
         - Undetected: {undetected}\n\
         - Total Engines: {total}\n\
         \n\
         Top Detections:\n\
         {detections_text}\n\
         \n\
         Please provide:\n\
         1. Risk Assessment: Evaluate the overall risk level based on the scan results\n\
         2. Analysis: Explain what the detections mean and whether they are false positives\n\
         3. Recommendation: Should this process be terminated? What actions should be taken?\n\
         4. Additional Context: Any relevant information about this process type\n\
         \n\
         Keep the response clear, professional, and actionable. Use bullet points for clarity.",
        name = process.name,
        pid = process.pid,
        cpu = process.cpu_percent,
        mem = process.memory_mb(),
        path = report.file_path,
        hash = report.sha256,
        level = report.threat_level(),
        malicious = report.malicious,
        suspicious = report.suspicious,
        harmless = report.harmless,
        undetected = report.undetected,
        total = report.total_engines(),
    )
}

fn or_unknown(s: &str) -> &str {
    if s.is_empty() {
        "unknown"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::Detection;

    fn process() -> ProcessInfo {
        ProcessInfo {
            pid: 1234,
            name: "nginx".into(),
            cpu_percent: 12.34,
            memory_bytes: 64 * 1024 * 1024,
            memory_percent: 0.8,
            owner: "www-data".into(),
            command_line: String::new(),
        }
    }

    #[test]
    fn inspect_prompt_carries_process_attributes() {
        let prompt = inspect_prompt(&process());
        assert!(prompt.contains("Process Name: nginx"));
        assert!(prompt.contains("PID: 1234"));
        assert!(prompt.contains("CPU Usage: 12.3%"));
        assert!(prompt.contains("Memory Usage: 64MB"));
        assert!(prompt.contains("Command Line: unknown"));
        assert!(prompt.contains("under 200 words"));
    }

    #[test]
    fn scan_prompt_lists_capped_detections() {
        let report = ScanReport {
            process_name: "nginx".into(),
            pid: 1234,
            file_path: "/usr/sbin/nginx".into(),
            sha256: "deadbeef".into(),
            malicious: 7,
            suspicious: 0,
            harmless: 10,
            undetected: 3,
            detections: (0..7)
                .map(|i| Detection {
                    engine: format!("Engine{}", i),
                    result: "Trojan.Gen".into(),
                })
                .collect(),
        };
        let prompt = scan_prompt(&process(), &report);
        assert!(prompt.contains("Threat Level: HIGH"));
        assert!(prompt.contains("Total Engines: 20"));
        assert!(prompt.contains("5. Engine4: Trojan.Gen"));
        assert!(!prompt.contains("Engine5"));
    }

    #[test]
    fn scan_prompt_without_detections_says_none() {
        let report = ScanReport {
            process_name: "nginx".into(),
            pid: 1,
            file_path: "/x".into(),
            sha256: "00".into(),
            malicious: 0,
            suspicious: 0,
            harmless: 5,
            undetected: 5,
            detections: Vec::new(),
        };
        assert!(scan_prompt(&process(), &report).contains("Top Detections:\nNone"));
    }
}
