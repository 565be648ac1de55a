use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::schema::OutputSchemaSpec;
use crate::llm_client::CompletionEnvelope;
use crate::models::candidate::CandidateRecord;
use crate::screening::prompts::{default_screening_schema, DEFAULT_SCREENING_INSTRUCTION};
use crate::state::AppState;

/// One expected output key. Sent as an array so the caller controls key
/// order in the rendered prompt.
#[derive(Debug, Deserialize)]
pub struct SchemaKeySpec {
    pub key: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub candidate_id: String,
    /// Defaults to the stock screening instruction when omitted.
    pub instruction: Option<String>,
    /// Defaults to the stock screening schema when omitted.
    pub schema: Option<Vec<SchemaKeySpec>>,
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(State(state): State<AppState>) -> Json<Vec<String>> {
    let mut ids: Vec<String> = state.candidates.keys().cloned().collect();
    ids.sort();
    Json(ids)
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CandidateRecord>, AppError> {
    let candidate = state
        .candidates
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(candidate.clone()))
}

/// POST /api/v1/screening/analyze
///
/// Returns the gateway envelope as-is: callers get `result` or `error`
/// plus token usage, never an HTTP failure for a model-side problem.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<CompletionEnvelope>, AppError> {
    let candidate = state.candidates.get(&req.candidate_id).ok_or_else(|| {
        AppError::NotFound(format!("Candidate {} not found", req.candidate_id))
    })?;

    let instruction = req
        .instruction
        .as_deref()
        .unwrap_or(DEFAULT_SCREENING_INSTRUCTION);

    let schema = match &req.schema {
        Some(keys) if !keys.is_empty() => keys.iter().fold(OutputSchemaSpec::new(), |spec, k| {
            spec.key(&k.key, &k.description)
        }),
        _ => default_screening_schema(),
    };

    let envelope =
        crate::screening::analyze_candidate(state.llm.as_ref(), candidate, instruction, &schema)
            .await;

    Ok(Json(envelope))
}
