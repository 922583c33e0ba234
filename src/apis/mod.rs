pub mod checker;

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::document::SelectedFile;

/// Response body of `POST /check-plagiarism/`, exactly as the service sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnalysis {
    pub overall_score: f64,
    pub similar_papers: Option<Vec<RawPaper>>,
    pub words_processed: Option<RawWordCount>,
    pub databases_checked: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPaper {
    pub title: Option<String>,
    pub score: f64,
    pub authors: Option<Vec<String>>,
    pub journal: Option<String>,
    pub year: Option<RawYear>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub link: Option<String>,
    pub doi: Option<String>,
}

/// Publication year as sent: `2017`, `2017.0` or `"2017"`. Anything else is
/// kept as `Other` so one odd field never rejects the whole report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawYear {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

/// `words_processed` arrives either as a number or as preformatted text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawWordCount {
    Count(serde_json::Number),
    Text(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("service returned HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A remote service that scores a document against published work.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    fn name(&self) -> &str;
    async fn check(&self, file: &SelectedFile) -> Result<RawAnalysis, ServiceError>;
}
