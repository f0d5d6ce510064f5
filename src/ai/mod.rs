//! AI analysis collaborator.

mod gemini;
mod prompt;

use async_trait::async_trait;

pub use gemini::GeminiClient;

use crate::error::AnalysisError;
use crate::models::{ProcessInfo, ScanReport};

/// Produces free-form analysis text for a process.
#[async_trait]
pub trait ProcessAnalyzer: Send + Sync {
    async fn analyze_process(&self, process: &ProcessInfo) -> Result<String, AnalysisError>;

    /// Interpret a successful scan report for the same process.
    async fn analyze_scan(
        &self,
        process: &ProcessInfo,
        report: &ScanReport,
    ) -> Result<String, AnalysisError>;
}
