use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::{AnalysisService, RawAnalysis, ServiceError};
use crate::document::SelectedFile;

const ENDPOINT: &str = "/check-plagiarism/";

/// Client for the plagiarism analysis backend.
pub struct PlagiarismClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl PlagiarismClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .user_agent("integrity-check/0.1")
            .timeout(timeout)
            .build()
            .map_err(ServiceError::Http)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ENDPOINT)
    }

    fn classify(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Timeout(self.timeout)
        } else {
            ServiceError::Http(err)
        }
    }
}

#[async_trait]
impl AnalysisService for PlagiarismClient {
    fn name(&self) -> &str {
        "plagiarism-service"
    }

    async fn check(&self, file: &SelectedFile) -> Result<RawAnalysis, ServiceError> {
        let part = Part::bytes(file.content.clone()).file_name(file.name.clone());
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `message` first, then a FastAPI-style string `detail`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}
