use std::path::Path;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::apis::AnalysisService;
use crate::document::{self, SelectedFile};
use crate::error::AnalysisError;
use crate::report::{map_response, AnalysisResult};

/// What the page currently shows. Exactly one view at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Idle,
    FileSelected {
        file: SelectedFile,
    },
    Loading {
        file: SelectedFile,
        ticket: u64,
    },
    Error {
        message: String,
        file: Option<SelectedFile>,
    },
    Results {
        file: SelectedFile,
        result: AnalysisResult,
    },
}

impl ViewState {
    pub fn file(&self) -> Option<&SelectedFile> {
        match self {
            ViewState::Idle => None,
            ViewState::FileSelected { file }
            | ViewState::Loading { file, .. }
            | ViewState::Results { file, .. } => Some(file),
            ViewState::Error { file, .. } => file.as_ref(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::FileSelected { .. } => "file_selected",
            ViewState::Loading { .. } => "loading",
            ViewState::Error { .. } => "error",
            ViewState::Results { .. } => "results",
        }
    }
}

/// Controlled value of the file picker input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePicker {
    pub value: Option<String>,
}

/// A submission handed out by [`Session::begin_submission`].
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: u64,
    pub file: SelectedFile,
}

/// Single-page view state plus the picker it controls.
#[derive(Debug, Default)]
pub struct Session {
    state: ViewState,
    picker: FilePicker,
    next_ticket: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn picker(&self) -> &FilePicker {
        &self.picker
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading { .. })
    }

    /// Apply the outcome of picking a file.
    ///
    /// A rejected pick keeps the previous file selected and shows the error.
    /// The picker is disabled while an analysis runs, so picks are refused
    /// without touching the view.
    pub fn select(&mut self, picked: Result<SelectedFile, AnalysisError>) -> Result<(), AnalysisError> {
        if self.is_loading() {
            return Err(AnalysisError::AnalysisInProgress);
        }
        match picked {
            Ok(file) => {
                info!("Selected {} ({}, {} bytes)", file.name, file.extension, file.size());
                self.picker.value = Some(file.name.clone());
                self.state = ViewState::FileSelected { file };
                Ok(())
            }
            Err(e) => {
                warn!("Rejected document: {}", e);
                self.show_error(&e);
                Err(e)
            }
        }
    }

    /// Move into `Loading` if a file is selected and nothing is in flight.
    pub fn begin_submission(&mut self) -> Result<Submission, AnalysisError> {
        if self.is_loading() {
            return Err(AnalysisError::AnalysisInProgress);
        }
        let Some(file) = self.state.file().cloned() else {
            let err = AnalysisError::NoFileSelected;
            self.show_error(&err);
            return Err(err);
        };

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.state = ViewState::Loading {
            file: file.clone(),
            ticket,
        };
        Ok(Submission { ticket, file })
    }

    /// Settle a submission. Returns `false` when the submission was abandoned
    /// by a reset (or superseded) and the outcome was dropped.
    pub fn complete(&mut self, ticket: u64, outcome: &Result<AnalysisResult, AnalysisError>) -> bool {
        match &self.state {
            ViewState::Loading { ticket: current, .. } if *current == ticket => {}
            _ => return false,
        }
        let ViewState::Loading { file, .. } = std::mem::take(&mut self.state) else {
            return false;
        };
        self.state = match outcome {
            Ok(result) => ViewState::Results {
                file,
                result: result.clone(),
            },
            Err(e) => ViewState::Error {
                message: e.user_message(),
                file: Some(file),
            },
        };
        true
    }

    /// Back to the empty upload page. Abandons an in-flight submission.
    pub fn reset(&mut self) {
        if let ViewState::Loading { ticket, .. } = &self.state {
            warn!("Reset abandons submission #{}", ticket);
        }
        self.state = ViewState::Idle;
        self.picker = FilePicker::default();
    }

    fn show_error(&mut self, err: &AnalysisError) {
        let file = self.state.file().cloned();
        self.state = ViewState::Error {
            message: err.user_message(),
            file,
        };
    }
}

/// Run one analysis of the selected document against `service`.
///
/// The session lock is released while the request is in flight.
pub async fn analyze(
    session: &Mutex<Session>,
    service: &dyn AnalysisService,
) -> Result<AnalysisResult, AnalysisError> {
    let submission = session.lock().await.begin_submission()?;
    info!(
        "Submission #{}: sending {} to {}",
        submission.ticket,
        submission.file.name,
        service.name()
    );

    let started = Instant::now();
    let response = service.check(&submission.file).await;
    let elapsed = started.elapsed();

    let outcome = match response {
        Ok(raw) => {
            let result = map_response(raw, elapsed);
            info!(
                "Submission #{}: score {} with {} similar papers in {}",
                submission.ticket,
                result.overall_score,
                result.similar_papers.len(),
                result.analysis_time_label()
            );
            Ok(result)
        }
        Err(e) => {
            error!("Academic integrity analysis failed: {}", e);
            Err(AnalysisError::from(e))
        }
    };

    if !session.lock().await.complete(submission.ticket, &outcome) {
        warn!("Submission #{} finished after a reset; discarding", submission.ticket);
    }
    outcome
}

/// Pick the document at `path`. While a submission is in flight the picker
/// is disabled and the file is never read.
pub async fn pick(session: &Mutex<Session>, path: &Path) -> Result<(), AnalysisError> {
    if session.lock().await.is_loading() {
        return Err(AnalysisError::AnalysisInProgress);
    }
    let picked = document::load(path).await;
    session.lock().await.select(picked)
}
