use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::agent::actions::ParameterSpec;
use crate::agent::runner::run_to_completion;
use crate::agent::session::AgentSession;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ActionCatalogEntry {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    pub terminal: bool,
}

/// GET /api/v1/agent/actions
/// The action vocabulary exactly as the decision loop offers it to the model.
pub async fn handle_list_actions(State(state): State<AppState>) -> Json<Vec<ActionCatalogEntry>> {
    let catalog = state
        .registry
        .iter()
        .map(|action| ActionCatalogEntry {
            name: action.name.clone(),
            description: action.description.clone(),
            parameters: action.parameters.clone(),
            terminal: action.terminal,
        })
        .collect();
    Json(catalog)
}

/// POST /api/v1/agent/screen/:candidate_id
/// Runs the decision loop for one candidate and returns the full session.
pub async fn handle_screen_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<Json<AgentSession>, AppError> {
    let candidate = state
        .candidates
        .get(&candidate_id)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let session = run_to_completion(
        state.llm.as_ref(),
        &state.registry,
        candidate,
        &state.job_requirements,
    )
    .await;

    Ok(Json(session))
}
