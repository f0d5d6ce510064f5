//! Typed errors for sampling, analysis, scanning, and configuration.

use std::time::Duration;

use thiserror::Error;

/// Wholesale failure of an OS collaborator for one sampling tick.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("process enumeration failed: {0}")]
    Enumeration(String),
    #[error("system metrics unavailable: {0}")]
    Metrics(String),
}

/// Failure of the AI analysis collaborator.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no Gemini API key configured")]
    MissingKey,
    #[error("authentication failed ({0})")]
    Auth(u16),
    #[error("rate limited by the AI service")]
    RateLimited,
    #[error("AI service error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("AI service returned an empty response")]
    EmptyResponse,
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Failure of the malware-scan collaborator.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no VirusTotal API key configured")]
    MissingKey,
    #[error("failed to get executable path for PID {pid}: {reason}")]
    Executable { pid: u32, reason: String },
    #[error("failed to calculate hash: {0}")]
    Hash(String),
    #[error("file not found in VirusTotal database")]
    NotFound,
    #[error("VirusTotal rate limit exceeded")]
    RateLimited,
    #[error("VirusTotal rejected the API key ({0})")]
    Auth(u16),
    #[error("VT API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("malformed VirusTotal report: {0}")]
    Decode(String),
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Failure reading or writing local configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {message}")]
    Parse { path: String, message: String },
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        AnalysisError::Transport(e.to_string())
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ScanError::Decode(e.to_string())
        } else {
            ScanError::Transport(e.to_string())
        }
    }
}
