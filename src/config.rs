use std::sync::Arc;
use std::time::Duration;

use crate::apis::checker::PlagiarismClient;
use crate::apis::{AnalysisService, ServiceError};

const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_MS: u64 = 45_000;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_url: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let service_url = var("INTEGRITY_SERVICE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

        let timeout_ms = match var("INTEGRITY_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring INTEGRITY_TIMEOUT_MS={:?}: not a number of milliseconds", raw);
                DEFAULT_TIMEOUT_MS
            }),
            None => DEFAULT_TIMEOUT_MS,
        };

        Self {
            service_url,
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Build the analysis backend client.
    pub fn build_service(&self) -> Result<Arc<dyn AnalysisService>, ServiceError> {
        let client = PlagiarismClient::new(self.service_url.clone(), self.request_timeout)?;
        Ok(Arc::new(client))
    }
}
