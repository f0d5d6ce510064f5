use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::MalwareScanner;
use crate::constants::{API_ERROR_BODY_LEN, VIRUSTOTAL_API_BASE, VT_HTTP_TIMEOUT_SECS};
use crate::error::ScanError;
use crate::models::{Detection, ProcessInfo, ScanReport};

/// Category counts and per-engine verdicts for one file hash.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileReport {
    pub malicious: u32,
    pub suspicious: u32,
    pub harmless: u32,
    pub undetected: u32,
    pub detections: Vec<Detection>,
}

#[derive(Deserialize)]
struct ApiResponse {
    data: ApiData,
}

#[derive(Deserialize)]
struct ApiData {
    attributes: ApiAttributes,
}

#[derive(Deserialize)]
struct ApiAttributes {
    #[serde(default)]
    last_analysis_stats: ApiStats,
    #[serde(default)]
    last_analysis_results: BTreeMap<String, EngineResult>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ApiStats {
    malicious: u32,
    suspicious: u32,
    undetected: u32,
    harmless: u32,
}

#[derive(Deserialize)]
struct EngineResult {
    #[serde(default)]
    category: String,
    result: Option<String>,
}

impl EngineResult {
    fn is_detection(&self) -> bool {
        self.category == "malicious" || self.category == "suspicious"
    }
}

/// VirusTotal v3 file-report lookup.
pub struct VirusTotalClient {
    client: Client,
    api_key: String,
    base_url: String,
    /// Resolves a pid to its executable. Swapped out in tests.
    resolve_exe: fn(u32) -> Result<PathBuf, String>,
}

impl VirusTotalClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ScanError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ScanError::MissingKey);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(VT_HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ScanError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: VIRUSTOTAL_API_BASE.to_string(),
            resolve_exe: crate::monitor::executable_path,
        })
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[cfg(test)]
    fn with_exe_resolver(mut self, resolve: fn(u32) -> Result<PathBuf, String>) -> Self {
        self.resolve_exe = resolve;
        self
    }

    /// Fetch the report for a SHA-256 hex digest.
    pub async fn lookup(&self, sha256: &str) -> Result<FileReport, ScanError> {
        let url = format!(
            "{}/api/v3/files/{}",
            self.base_url.trim_end_matches('/'),
            sha256
        );
        debug!(hash = sha256, "VirusTotal lookup");

        let response = self
            .client
            .get(&url)
            .header("x-apikey", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                404 => ScanError::NotFound,
                429 => ScanError::RateLimited,
                401 | 403 => ScanError::Auth(status.as_u16()),
                code => ScanError::Api {
                    status: code,
                    body: crate::utils::truncate_str(&body_text, API_ERROR_BODY_LEN),
                },
            });
        }

        let parsed: ApiResponse = response.json().await?;
        let attrs = parsed.data.attributes;
        let detections = attrs
            .last_analysis_results
            .into_iter()
            .filter(|(_, r)| r.is_detection())
            .map(|(engine, r)| Detection {
                engine,
                result: r.result.unwrap_or_else(|| r.category.clone()),
            })
            .collect();

        Ok(FileReport {
            malicious: attrs.last_analysis_stats.malicious,
            suspicious: attrs.last_analysis_stats.suspicious,
            harmless: attrs.last_analysis_stats.harmless,
            undetected: attrs.last_analysis_stats.undetected,
            detections,
        })
    }
}

#[async_trait]
impl MalwareScanner for VirusTotalClient {
    async fn scan(&self, process: &ProcessInfo) -> Result<ScanReport, ScanError> {
        let pid = process.pid;
        let resolve = self.resolve_exe;
        let (path, sha256) = tokio::task::spawn_blocking(move || {
            let path = resolve(pid).map_err(|reason| ScanError::Executable { pid, reason })?;
            let hash = hash_file(&path)?;
            Ok::<_, ScanError>((path, hash))
        })
        .await
        .map_err(|e| ScanError::Hash(e.to_string()))??;

        let report = self.lookup(&sha256).await?;
        Ok(ScanReport {
            process_name: process.name.clone(),
            pid,
            file_path: path.display().to_string(),
            sha256,
            malicious: report.malicious,
            suspicious: report.suspicious,
            harmless: report.harmless,
            undetected: report.undetected,
            detections: report.detections,
        })
    }
}

/// SHA-256 of a file, hex encoded.
pub fn hash_file(path: &Path) -> Result<String, ScanError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| ScanError::Hash(format!("{}: {}", path.display(), e)))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .map_err(|e| ScanError::Hash(format!("{}: {}", path.display(), e)))?;
    Ok(hex::encode(hasher.finalize()))
}
