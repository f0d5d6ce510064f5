//! Panel text written by the action pipeline.
//!
//! All of it uses the `[color]…[-]` markup understood by the panel renderer.

use std::fmt::Display;

use crate::constants::*;
use crate::models::{ProcessInfo, ScanReport};
use crate::utils::{text_bar, truncate_str};

// ── Placeholders ──────────────────────────────────────────────────

pub fn ai_placeholder() -> String {
    "[cyan]Select a process and press 'i' to inspect[-]\n\n\
     [yellow]Note:[white] AI features require a valid Gemini API key.\n\
     Press 's' to configure in Settings.[-]"
        .to_string()
}

pub fn scan_placeholder() -> String {
    "[cyan]Press 't' to scan selected process[-]\n\n\
     [yellow]Status:[white] Ready[-]\n\n\
     [dim]No scan performed yet[-]"
        .to_string()
}

// ── Missing collaborators ─────────────────────────────────────────

pub fn ai_unavailable() -> String {
    "[red]AI Service not available. Please configure API key in Settings (press 's')[-]".to_string()
}

pub fn scanner_unavailable() -> String {
    "[red]VirusTotal Service not available. Please configure API key in Settings (press 's')[-]"
        .to_string()
}

pub fn ai_unavailable_for_scan() -> String {
    "[red]AI Service not available. Please configure Gemini API key in Settings (press 's')[-]"
        .to_string()
}

// ── Inspect ───────────────────────────────────────────────────────

pub fn inspecting(process: &ProcessInfo) -> String {
    format!(
        "[yellow]Analyzing process...[-]\n\n[cyan]Process:[-] {} (PID: {})",
        process.name, process.pid
    )
}

pub fn inspect_result(process: &ProcessInfo, analysis: &str) -> String {
    format!(
        "[cyan]AI Analysis: {} (PID: {})[-]\n\n{}",
        process.name, process.pid, analysis
    )
}

pub fn inspect_failed(process: &ProcessInfo, err: &impl Display) -> String {
    format!(
        "[red]AI Analysis Failed[-]\n\n\
         [yellow]Process:[-] {} (PID: {})\n\
         [red]Error:[-] {}\n\n\
         [yellow]Possible reasons:[-]\n\
         • Invalid or expired API key\n\
         • Network connection issue\n\
         • API service unavailable\n\n\
         [cyan]Please check your API key in Settings (press 's')[-]",
        process.name, process.pid, err
    )
}

// ── Scan ──────────────────────────────────────────────────────────

pub fn scanning(process: &ProcessInfo) -> String {
    format!(
        "[yellow]⟳ Scanning Process...[-]\n\n\
         [cyan]Process:[-] {}\n\
         [cyan]PID:[-] {}\n\n\
         [dim]Connecting to VirusTotal...\n\
         Please wait...[-]",
        process.name, process.pid
    )
}

pub fn waiting_for_scan() -> String {
    "[yellow]Waiting for VirusTotal scan...[-]".to_string()
}

pub fn analyzing_scan() -> String {
    "[yellow]Analyzing with AI...\n\nPlease wait...[-]".to_string()
}

pub fn scan_failed(process: &ProcessInfo, err: &impl Display) -> String {
    format!(
        "[red]✗ Scan Failed[-]\n\n\
         [yellow]Process:[-] {} (PID: {})\n\n\
         [red]Error:[-] {}\n\n\
         [yellow]Possible reasons:[-]\n\
         • Invalid or expired API key\n\
         • File not found in VT database\n\
         • Network connection issue\n\
         • Rate limit exceeded\n\n\
         [cyan]Press 's' to configure API key[-]",
        process.name, process.pid, err
    )
}

/// AI slot text when the scan stage failed and analysis never ran.
pub fn analysis_skipped(process: &ProcessInfo) -> String {
    format!(
        "[dim]AI analysis skipped for {} (PID: {}): the VirusTotal scan did not complete.[-]",
        process.name, process.pid
    )
}

pub fn scan_analysis_result(analysis: &str) -> String {
    format!(
        "[cyan]AI Security Analysis[-]\n\
         [cyan]═══════════════════════════════════[-]\n\n\
         {}",
        analysis
    )
}

pub fn scan_analysis_failed(process: &ProcessInfo, err: &impl Display) -> String {
    format!(
        "[red]AI Analysis Failed[-]\n\n\
         [yellow]Process:[-] {} (PID: {})\n\
         [red]Error:[-] {}\n\n\
         Please review the VirusTotal results in the center panel.\n\n\
         [cyan]Press 's' to configure Gemini API key[-]",
        process.name, process.pid, err
    )
}

/// Scan result panel body.
pub fn format_scan_report(report: &ScanReport) -> String {
    let level = report.threat_level();
    let total = report.total_engines();
    let detected = report.detected_engines();

    let bar_color = usage_markup_color(if total == 0 {
        0.0
    } else {
        detected as f32 / total as f32 * 100.0
    });

    let mut out = format!(
        "[{color}]{icon} {level}[-]\n\n\
         [cyan]Process Information[-]\n\
         Name: [white]{name}[-]\n\
         PID:  [white]{pid}[-]\n\n\
         [cyan]File Details[-]\n\
         Path: [white]{path}[-]\n\
         Hash: [white]{hash}[-]\n\n\
         [cyan]Detection Results[-]\n\
         Engines: [white]{detected} / {total}[-] detected\n\
         [{bar_color}]{bar}[-]\n\n\
         [cyan]Summary[-]\n\
         [white]{summary}[-]\n\n",
        color = level.color(),
        icon = level.icon(),
        level = level,
        name = report.process_name,
        pid = report.pid,
        path = truncate_path(&report.file_path, SCAN_PATH_DISPLAY_LEN),
        hash = short_hash(&report.sha256),
        bar = text_bar(detected, total, DETECTION_BAR_WIDTH),
        summary = report.summary(),
    );

    if detected > 0 && !report.detections.is_empty() {
        out.push_str("[cyan]Top Detections[-]\n");
        for d in report.top_detections(MAX_TOP_DETECTIONS) {
            out.push_str(&format!(
                "• [yellow]{}[-]: {}\n",
                d.engine,
                truncate_str(&d.result, SCAN_RESULT_DISPLAY_LEN)
            ));
        }
        let shown = MAX_TOP_DETECTIONS as u64;
        if detected > shown {
            out.push_str(&format!("\n[dim]...and {} more[-]", detected - shown));
        }
    }
    out
}

/// Keep the tail of a long path, prefixed with "...".
fn truncate_path(path: &str, max_len: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_len || max_len <= 3 {
        return path.to_string();
    }
    let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
    format!("...{}", tail)
}

fn short_hash(hash: &str) -> String {
    if hash.len() > SCAN_HASH_DISPLAY_LEN {
        format!("{}...", &hash[..SCAN_HASH_DISPLAY_LEN])
    } else {
        hash.to_string()
    }
}

fn usage_markup_color(percent: f32) -> &'static str {
    if percent < 50.0 {
        "green"
    } else if percent < 80.0 {
        "yellow"
    } else {
        "red"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::Detection;

    fn process() -> ProcessInfo {
        ProcessInfo {
            pid: 321,
            name: "miner".into(),
            cpu_percent: 99.0,
            memory_bytes: 0,
            memory_percent: 0.0,
            owner: "nobody".into(),
            command_line: String::new(),
        }
    }

    fn report(detections: usize, malicious: u32) -> ScanReport {
        ScanReport {
            process_name: "miner".into(),
            pid: 321,
            file_path: "/opt/some/really/long/directory/tree/bin/miner".into(),
            sha256: "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef".into(),
            malicious,
            suspicious: 0,
            harmless: 40,
            undetected: 10,
            detections: (0..detections)
                .map(|i| Detection {
                    engine: format!("Engine{}", i),
                    result: "Trojan.GenericKD.123456789.Variant".into(),
                })
                .collect(),
        }
    }

    #[test]
    fn failure_messages_name_the_process() {
        let p = process();
        let err = "timed out after 30s";
        for msg in [
            inspect_failed(&p, &err),
            scan_failed(&p, &err),
            scan_analysis_failed(&p, &err),
        ] {
            assert!(msg.contains("miner (PID: 321)"));
            assert!(msg.contains(err));
        }
        assert!(analysis_skipped(&p).contains("PID: 321"));
    }

    #[test]
    fn report_shows_level_and_truncations() {
        let text = format_scan_report(&report(2, 2));
        assert!(text.starts_with("[yellow]⚡ MEDIUM[-]"));
        assert!(text.contains("Hash: [white]0123456789abcdef...[-]"));
        assert!(text.contains("Path: [white]..."));
        assert!(text.contains("Engines: [white]2 / 52[-] detected"));
        assert!(text.contains("• [yellow]Engine0[-]: Trojan.GenericKD.12345..."));
        assert!(!text.contains("more[-]"));
    }

    #[test]
    fn report_counts_hidden_detections() {
        let text = format_scan_report(&report(8, 8));
        assert!(text.contains("Engine4"));
        assert!(!text.contains("Engine5"));
        assert!(text.contains("...and 3 more"));
    }

    #[test]
    fn clean_report_has_no_detection_section() {
        let text = format_scan_report(&report(0, 0));
        assert!(text.starts_with("[green]✓ SAFE[-]"));
        assert!(!text.contains("Top Detections"));
    }

    #[test]
    fn truncate_path_keeps_tail() {
        assert_eq!(truncate_path("/usr/bin/ls", 35), "/usr/bin/ls");
        let long = "/a/very/long/path/that/goes/on/and/on/bin/thing";
        let out = truncate_path(long, 20);
        assert_eq!(out.chars().count(), 20);
        assert!(out.starts_with("..."));
        assert!(out.ends_with("bin/thing"));
    }
}
