//! Malware-scan collaborator.

mod virustotal;

use async_trait::async_trait;

pub use virustotal::VirusTotalClient;

use crate::error::ScanError;
use crate::models::{ProcessInfo, ScanReport};

/// Looks up a running process's executable with a reputation service.
#[async_trait]
pub trait MalwareScanner: Send + Sync {
    async fn scan(&self, process: &ProcessInfo) -> Result<ScanReport, ScanError>;
}
