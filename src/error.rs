use std::path::PathBuf;

use thiserror::Error;

use crate::apis::ServiceError;

pub const INVALID_FILE_TYPE_MESSAGE: &str = "Please upload a PDF, DOC, DOCX, or TXT file.";
pub const NO_FILE_SELECTED_MESSAGE: &str = "Please select a research document to analyze.";
pub const TIMEOUT_MESSAGE: &str = "Analysis timeout. Please try with a smaller document.";
pub const UNAVAILABLE_MESSAGE: &str = "Academic database temporarily unavailable. Please try again.";

/// Everything that can go wrong between picking a document and showing its report.
///
/// `Display` carries the diagnostic detail for logs; [`AnalysisError::user_message`]
/// is what the page shows.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("unsupported file type for {name:?} (extension {extension:?})")]
    InvalidFileType { name: String, extension: String },
    #[error("no document selected")]
    NoFileSelected,
    #[error("an analysis is already in progress")]
    AnalysisInProgress,
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("analysis request timed out")]
    RequestTimeout,
    #[error("analysis service error: {0}")]
    ServerError(String),
    #[error("analysis failed: {0}")]
    UnknownFailure(String),
}

impl AnalysisError {
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InvalidFileType { .. } => INVALID_FILE_TYPE_MESSAGE.to_string(),
            AnalysisError::NoFileSelected => NO_FILE_SELECTED_MESSAGE.to_string(),
            AnalysisError::AnalysisInProgress => {
                "An analysis is already running. Please wait for it to finish.".to_string()
            }
            AnalysisError::Unreadable { path, .. } => {
                format!("Could not read {}. Please choose another file.", path.display())
            }
            AnalysisError::RequestTimeout => TIMEOUT_MESSAGE.to_string(),
            AnalysisError::ServerError(message) => message.clone(),
            AnalysisError::UnknownFailure(_) => UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

impl From<ServiceError> for AnalysisError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Timeout(_) => AnalysisError::RequestTimeout,
            ServiceError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => AnalysisError::ServerError(message),
            other => AnalysisError::UnknownFailure(other.to_string()),
        }
    }
}
