use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{prompt, ProcessAnalyzer};
use crate::constants::{API_ERROR_BODY_LEN, GEMINI_API_BASE};
use crate::error::AnalysisError;
use crate::models::{ProcessInfo, ScanReport};

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, AnalysisError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AnalysisError::MissingKey);
        }
        Ok(Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Point at a mock endpoint.
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        debug!(model = %self.model, "sending Gemini request");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => AnalysisError::Auth(status.as_u16()),
                429 => AnalysisError::RateLimited,
                code => AnalysisError::Api {
                    status: code,
                    body: crate::utils::truncate_str(&body_text, API_ERROR_BODY_LEN),
                },
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl ProcessAnalyzer for GeminiClient {
    async fn analyze_process(&self, process: &ProcessInfo) -> Result<String, AnalysisError> {
        self.generate(&prompt::inspect_prompt(process)).await
    }

    async fn analyze_scan(
        &self,
        process: &ProcessInfo,
        report: &ScanReport,
    ) -> Result<String, AnalysisError> {
        self.generate(&prompt::scan_prompt(process, report)).await
    }
}
