//! Background inspect/scan actions.
//!
//! Each action is one spawned task with its own deadline. The triggering
//! call writes the "in progress" text, spawns, and returns the handle
//! without awaiting it. Overlapping actions are not de-duplicated; the last
//! write to a slot wins.

pub mod messages;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{error, info};

use crate::ai::ProcessAnalyzer;
use crate::error::{AnalysisError, ScanError};
use crate::models::ProcessInfo;
use crate::scan::MalwareScanner;
use crate::state::SharedState;

pub struct ActionOrchestrator {
    state: Arc<SharedState>,
    analyzer: RwLock<Option<Arc<dyn ProcessAnalyzer>>>,
    scanner: RwLock<Option<Arc<dyn MalwareScanner>>>,
    inspect_timeout: Duration,
    scan_timeout: Duration,
}

impl ActionOrchestrator {
    pub fn new(state: Arc<SharedState>, inspect_timeout: Duration, scan_timeout: Duration) -> Self {
        Self {
            state,
            analyzer: RwLock::new(None),
            scanner: RwLock::new(None),
            inspect_timeout,
            scan_timeout,
        }
    }

    /// Install or remove the AI collaborator. In-flight actions keep the old one.
    pub fn set_analyzer(&self, analyzer: Option<Arc<dyn ProcessAnalyzer>>) {
        *self.analyzer.write().unwrap_or_else(PoisonError::into_inner) = analyzer;
    }

    pub fn set_scanner(&self, scanner: Option<Arc<dyn MalwareScanner>>) {
        *self.scanner.write().unwrap_or_else(PoisonError::into_inner) = scanner;
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer().is_some()
    }

    pub fn has_scanner(&self) -> bool {
        self.scanner().is_some()
    }

    fn analyzer(&self) -> Option<Arc<dyn ProcessAnalyzer>> {
        self.analyzer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn scanner(&self) -> Option<Arc<dyn MalwareScanner>> {
        self.scanner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Analyze `process` with the AI collaborator under the inspect deadline.
    ///
    /// Returns `None` when nothing was spawned (no collaborator).
    pub fn run_inspect(&self, process: ProcessInfo) -> Option<JoinHandle<()>> {
        let Some(analyzer) = self.analyzer() else {
            self.state.set_ai_response(messages::ai_unavailable());
            return None;
        };

        self.state.set_ai_response(messages::inspecting(&process));
        let state = Arc::clone(&self.state);
        let limit = self.inspect_timeout;

        Some(tokio::spawn(async move {
            info!(pid = process.pid, name = %process.name, "inspect started");
            let result = match timeout(limit, analyzer.analyze_process(&process)).await {
                Ok(result) => result,
                Err(_) => Err(AnalysisError::Timeout(limit)),
            };
            match result {
                Ok(text) => {
                    info!(pid = process.pid, "inspect finished");
                    state.set_ai_response(messages::inspect_result(&process, &text));
                }
                Err(e) => {
                    error!(pid = process.pid, name = %process.name, "AI inspection failed: {}", e);
                    state.set_ai_response(messages::inspect_failed(&process, &e));
                }
            }
        }))
    }

    /// Scan `process`, then feed the report to the AI collaborator.
    ///
    /// Both stages share one deadline. Each stage posts its own progress text.
    pub fn run_scan(&self, process: ProcessInfo) -> Option<JoinHandle<()>> {
        let Some(scanner) = self.scanner() else {
            self.state.set_ai_response(messages::scanner_unavailable());
            return None;
        };
        let Some(analyzer) = self.analyzer() else {
            self.state.set_ai_response(messages::ai_unavailable_for_scan());
            return None;
        };

        self.state.set_scan_response(messages::scanning(&process));
        self.state.set_ai_response(messages::waiting_for_scan());
        let state = Arc::clone(&self.state);
        let limit = self.scan_timeout;

        Some(tokio::spawn(async move {
            let deadline = Instant::now() + limit;
            info!(pid = process.pid, name = %process.name, "scan started");

            let report = match timeout_at(deadline, scanner.scan(&process)).await {
                Ok(result) => result,
                Err(_) => Err(ScanError::Timeout(limit)),
            };
            let report = match report {
                Ok(report) => report,
                Err(e) => {
                    error!(pid = process.pid, name = %process.name, "scan failed: {}", e);
                    state.set_scan_response(messages::scan_failed(&process, &e));
                    state.set_ai_response(messages::analysis_skipped(&process));
                    return;
                }
            };

            info!(
                pid = process.pid,
                level = %report.threat_level(),
                "scan finished, starting analysis"
            );
            state.set_scan_response(messages::format_scan_report(&report));
            state.set_ai_response(messages::analyzing_scan());

            let analysis = match timeout_at(deadline, analyzer.analyze_scan(&process, &report)).await
            {
                Ok(result) => result,
                Err(_) => Err(AnalysisError::Timeout(limit)),
            };
            match analysis {
                Ok(text) => {
                    info!(pid = process.pid, "scan analysis finished");
                    state.set_ai_response(messages::scan_analysis_result(&text));
                }
                Err(e) => {
                    error!(pid = process.pid, name = %process.name, "scan analysis failed: {}", e);
                    state.set_ai_response(messages::scan_analysis_failed(&process, &e));
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::models::ScanReport;

    fn make_process() -> ProcessInfo {
        ProcessInfo {
            pid: 4242,
            name: "suspect".into(),
            cpu_percent: 50.0,
            memory_bytes: 10 * 1024 * 1024,
            memory_percent: 1.0,
            owner: "user".into(),
            command_line: "./suspect".into(),
        }
    }

    fn clean_report(process: &ProcessInfo) -> ScanReport {
        ScanReport {
            process_name: process.name.clone(),
            pid: process.pid,
            file_path: "/tmp/suspect".into(),
            sha256: "ff".repeat(32),
            malicious: 0,
            suspicious: 0,
            harmless: 60,
            undetected: 10,
            detections: Vec::new(),
        }
    }

    /// Analyzer whose calls never complete.
    struct HangingAnalyzer;

    #[async_trait]
    impl ProcessAnalyzer for HangingAnalyzer {
        async fn analyze_process(&self, _: &ProcessInfo) -> Result<String, AnalysisError> {
            std::future::pending().await
        }
        async fn analyze_scan(&self, _: &ProcessInfo, _: &ScanReport) -> Result<String, AnalysisError> {
            std::future::pending().await
        }
    }

    struct EchoAnalyzer;

    #[async_trait]
    impl ProcessAnalyzer for EchoAnalyzer {
        async fn analyze_process(&self, p: &ProcessInfo) -> Result<String, AnalysisError> {
            Ok(format!("{} looks fine", p.name))
        }
        async fn analyze_scan(&self, _: &ProcessInfo, r: &ScanReport) -> Result<String, AnalysisError> {
            Ok(format!("verdict {}", r.threat_level()))
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl ProcessAnalyzer for FailingAnalyzer {
        async fn analyze_process(&self, _: &ProcessInfo) -> Result<String, AnalysisError> {
            Err(AnalysisError::Auth(401))
        }
        async fn analyze_scan(&self, _: &ProcessInfo, _: &ScanReport) -> Result<String, AnalysisError> {
            Err(AnalysisError::EmptyResponse)
        }
    }

    struct CleanScanner;

    #[async_trait]
    impl MalwareScanner for CleanScanner {
        async fn scan(&self, p: &ProcessInfo) -> Result<ScanReport, ScanError> {
            Ok(clean_report(p))
        }
    }

    struct NotFoundScanner;

    #[async_trait]
    impl MalwareScanner for NotFoundScanner {
        async fn scan(&self, _: &ProcessInfo) -> Result<ScanReport, ScanError> {
            Err(ScanError::NotFound)
        }
    }

    fn orchestrator() -> (ActionOrchestrator, Arc<SharedState>) {
        let (state, _rx) = SharedState::new();
        let orch = ActionOrchestrator::new(
            Arc::clone(&state),
            Duration::from_secs(30),
            Duration::from_secs(60),
        );
        (orch, state)
    }

    // ── inspect ──

    #[tokio::test(start_paused = true)]
    async fn inspect_that_never_returns_times_out_with_message() {
        let (orch, state) = orchestrator();
        orch.set_analyzer(Some(Arc::new(HangingAnalyzer)));

        let handle = orch.run_inspect(make_process()).unwrap();
        assert!(state.ai_response().contains("Analyzing process"));

        handle.await.unwrap();
        let text = state.ai_response();
        assert!(text.contains("AI Analysis Failed"));
        assert!(text.contains("timed out after 30s"));
        assert!(text.contains("suspect (PID: 4242)"));
    }

    #[tokio::test]
    async fn inspect_success_writes_analysis() {
        let (orch, state) = orchestrator();
        orch.set_analyzer(Some(Arc::new(EchoAnalyzer)));

        orch.run_inspect(make_process()).unwrap().await.unwrap();
        assert!(state.ai_response().contains("suspect looks fine"));
    }

    #[tokio::test]
    async fn inspect_failure_is_formatted() {
        let (orch, state) = orchestrator();
        orch.set_analyzer(Some(Arc::new(FailingAnalyzer)));

        orch.run_inspect(make_process()).unwrap().await.unwrap();
        assert!(state.ai_response().contains("authentication failed (401)"));
    }

    #[tokio::test]
    async fn inspect_without_analyzer_spawns_nothing() {
        let (orch, state) = orchestrator();
        assert!(orch.run_inspect(make_process()).is_none());
        assert!(state.ai_response().contains("AI Service not available"));
    }

    // ── scan ──

    #[tokio::test]
    async fn scan_success_then_analysis_failure_keeps_slots_independent() {
        let (orch, state) = orchestrator();
        orch.set_scanner(Some(Arc::new(CleanScanner)));
        orch.set_analyzer(Some(Arc::new(FailingAnalyzer)));

        orch.run_scan(make_process()).unwrap().await.unwrap();

        let scan = state.scan_response();
        assert!(scan.contains("SAFE"));
        assert!(scan.contains("Clean - No threats detected by 70 engines"));
        let ai = state.ai_response();
        assert!(ai.contains("AI Analysis Failed"));
        assert!(ai.contains("suspect (PID: 4242)"));
        assert!(!scan.contains("AI Analysis Failed"));
    }

    #[tokio::test]
    async fn scan_failure_skips_analysis() {
        let (orch, state) = orchestrator();
        orch.set_scanner(Some(Arc::new(NotFoundScanner)));
        orch.set_analyzer(Some(Arc::new(EchoAnalyzer)));

        orch.run_scan(make_process()).unwrap().await.unwrap();

        assert!(state.scan_response().contains("file not found in VirusTotal database"));
        assert!(state.ai_response().contains("skipped"));
    }

    #[tokio::test]
    async fn scan_success_writes_both_stages() {
        let (orch, state) = orchestrator();
        orch.set_scanner(Some(Arc::new(CleanScanner)));
        orch.set_analyzer(Some(Arc::new(EchoAnalyzer)));

        orch.run_scan(make_process()).unwrap().await.unwrap();
        assert!(state.scan_response().contains("✓ SAFE"));
        assert!(state.ai_response().contains("verdict SAFE"));
    }

    #[tokio::test(start_paused = true)]
    async fn scan_analysis_shares_the_scan_deadline() {
        let (orch, state) = orchestrator();
        orch.set_scanner(Some(Arc::new(CleanScanner)));
        orch.set_analyzer(Some(Arc::new(HangingAnalyzer)));

        orch.run_scan(make_process()).unwrap().await.unwrap();
        assert!(state.scan_response().contains("SAFE"));
        assert!(state.ai_response().contains("timed out after 60s"));
    }

    #[tokio::test]
    async fn scan_requires_both_collaborators() {
        let (orch, state) = orchestrator();
        assert!(orch.run_scan(make_process()).is_none());
        assert!(state.ai_response().contains("VirusTotal Service not available"));

        orch.set_scanner(Some(Arc::new(CleanScanner)));
        assert!(orch.run_scan(make_process()).is_none());
        assert!(state.ai_response().contains("Gemini API key"));
        assert!(state.scan_response().is_empty());
    }

    #[tokio::test]
    async fn removing_collaborator_disables_action() {
        let (orch, _state) = orchestrator();
        orch.set_analyzer(Some(Arc::new(EchoAnalyzer)));
        assert!(orch.has_analyzer());
        orch.set_analyzer(None);
        assert!(!orch.has_analyzer());
        assert!(!orch.has_scanner());
    }
}
