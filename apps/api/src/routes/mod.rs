pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agent::handlers as agent_handlers;
use crate::screening::handlers as screening_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate lookup
        .route(
            "/api/v1/candidates",
            get(screening_handlers::handle_list_candidates),
        )
        .route(
            "/api/v1/candidates/:id",
            get(screening_handlers::handle_get_candidate),
        )
        // Single-shot structured analysis
        .route(
            "/api/v1/screening/analyze",
            post(screening_handlers::handle_analyze),
        )
        // Agent decision loop
        .route(
            "/api/v1/agent/actions",
            get(agent_handlers::handle_list_actions),
        )
        .route(
            "/api/v1/agent/screen/:candidate_id",
            post(agent_handlers::handle_screen_candidate),
        )
        .with_state(state)
}
