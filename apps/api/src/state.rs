use std::collections::HashMap;
use std::sync::Arc;

use crate::agent::actions::ActionRegistry;
use crate::config::Config;
use crate::llm_client::CompletionGateway;
use crate::models::candidate::CandidateRecord;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is read-only after startup, so concurrent screening
/// sessions share it freely.
#[derive(Clone)]
pub struct AppState {
    /// Completion gateway seam. Production wiring installs `LlmClient`.
    pub llm: Arc<dyn CompletionGateway>,
    /// Immutable action catalog for the decision loop.
    pub registry: Arc<ActionRegistry>,
    /// All candidate rows, loaded wholesale from the résumé CSV at startup.
    pub candidates: Arc<HashMap<String, CandidateRecord>>,
    /// Job-requirements document, read wholesale at startup.
    pub job_requirements: Arc<str>,
    pub config: Config,
}
