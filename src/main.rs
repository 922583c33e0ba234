use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters,
    model::*, tool, tool_handler, tool_router,
    transport::stdio, ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

mod apis;
mod config;
mod document;
mod error;
mod render;
mod report;
mod session;
mod severity;

use apis::AnalysisService;
use config::Config;
use session::Session;

// ── Parameter structs ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize, JsonSchema)]
struct SelectDocumentParams {
    #[schemars(description = "Path to the research document (.pdf, .doc, .docx or .txt)")]
    path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ClassifyScoreParams {
    #[schemars(description = "Similarity percentage, normally 0-100")]
    score: f64,
}

// ── Server ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct IntegrityServer {
    tool_router: ToolRouter<Self>,
    service: Arc<dyn AnalysisService>,
    session: Arc<Mutex<Session>>,
}

#[tool_router]
impl IntegrityServer {
    pub fn create() -> anyhow::Result<Self> {
        let config = Config::from_env();
        let service = config.build_service()?;

        tracing::info!(
            "Analysis service at {} (timeout {:?})",
            config.service_url,
            config.request_timeout
        );

        Ok(Self {
            tool_router: Self::tool_router(),
            service,
            session: Arc::new(Mutex::new(Session::new())),
        })
    }

    #[tool(description = "Choose the research document to analyze. Accepts PDF, DOC, DOCX or TXT files.")]
    async fn select_document(
        &self,
        Parameters(params): Parameters<SelectDocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = PathBuf::from(&params.path);
        let note = match session::pick(&self.session, &path).await {
            Err(e @ error::AnalysisError::AnalysisInProgress) => Some(e.user_message()),
            _ => None,
        };
        let session = self.session.lock().await;
        Ok(self.page(&session, note))
    }

    #[tool(description = "Upload the selected document to the plagiarism service and show the similarity report")]
    async fn analyze_document(&self) -> Result<CallToolResult, McpError> {
        let note = match session::analyze(&self.session, self.service.as_ref()).await {
            Err(e @ error::AnalysisError::AnalysisInProgress) => Some(e.user_message()),
            _ => None,
        };
        let session = self.session.lock().await;
        Ok(self.page(&session, note))
    }

    #[tool(description = "Start a new analysis: clear the selected document, report and errors")]
    async fn reset_analysis(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.reset();
        Ok(self.page(&session, None))
    }

    #[tool(description = "Show the current page: upload panel, progress, error or similarity report")]
    async fn show_analysis(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        Ok(self.page(&session, None))
    }

    #[tool(description = "Classify a similarity score into Low, Moderate, High or Critical")]
    async fn classify_score(
        &self,
        Parameters(params): Parameters<ClassifyScoreParams>,
    ) -> Result<CallToolResult, McpError> {
        let severity = severity::classify(params.score);
        let json = serde_json::to_string_pretty(&severity)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

impl IntegrityServer {
    fn page(&self, session: &Session, note: Option<String>) -> CallToolResult {
        tracing::debug!("Rendering {} view", session.state().name());
        let mut text = String::new();
        if let Some(note) = note {
            text.push_str(&note);
            text.push_str("\n\n");
        }
        text.push_str(&render::render(session, chrono::Local::now().date_naive()));
        CallToolResult::success(vec![Content::text(text)])
    }
}

#[tool_handler]
impl ServerHandler for IntegrityServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Academic Integrity Analyzer. Select a research document (PDF, DOC, DOCX or TXT), \
                 run the analysis, and review the similarity score and matching papers returned \
                 by the plagiarism service."
                    .into(),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting integrity-check MCP server");

    let server = IntegrityServer::create()?;
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
