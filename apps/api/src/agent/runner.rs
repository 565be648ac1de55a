//! The decision loop: alternates LLM decisions and action dispatch for one
//! candidate until the terminal action is chosen or a safety bound trips.
//!
//! Each iteration is strictly sequential: the next decision sees the
//! previous action's outcome in its context. Protocol violations are
//! recorded in session history and never reach a handler.

use tracing::{info, warn};

use crate::agent::actions::ActionRegistry;
use crate::agent::decision::{validate_decision, ProtocolViolation};
use crate::agent::prompts::{build_decision_instruction, decision_schema, AGENT_TEMPERATURE};
use crate::agent::session::{AgentSession, SessionState};
use crate::llm_client::context::ContextBundle;
use crate::llm_client::{CompletionGateway, MODEL};
use crate::models::candidate::CandidateRecord;

/// Hard cap on gateway round-trips per session. Bounds spend against the
/// remote API even if the model never chooses a terminal action.
pub const MAX_ITERATIONS: u32 = 10;

/// Consecutive protocol violations tolerated before the session aborts.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Creates a fresh session for the candidate and drives it to an end state.
pub async fn run_to_completion(
    gateway: &dyn CompletionGateway,
    registry: &ActionRegistry,
    candidate: &CandidateRecord,
    job_requirements: &str,
) -> AgentSession {
    let mut session = AgentSession::new(&candidate.id);
    drive(&mut session, gateway, registry, candidate, job_requirements).await;
    session
}

/// Drives a session until Done, Aborted, or the iteration cap. Calling this
/// on a finished session returns immediately without touching the gateway.
pub async fn drive(
    session: &mut AgentSession,
    gateway: &dyn CompletionGateway,
    registry: &ActionRegistry,
    candidate: &CandidateRecord,
    job_requirements: &str,
) {
    let instruction = build_decision_instruction(registry);
    let schema = decision_schema();

    while !session.finished() {
        if session.iterations >= MAX_ITERATIONS {
            warn!(
                candidate_id = %session.candidate_id,
                iterations = session.iterations,
                "Iteration cap reached without a terminal action; aborting session"
            );
            session.finish(SessionState::Aborted);
            break;
        }

        session.iterations += 1;
        session.state = SessionState::Deciding;

        let context = build_iteration_context(candidate, job_requirements, session);
        let envelope = gateway
            .invoke(&instruction, &context, &schema, MODEL, AGENT_TEMPERATURE)
            .await;

        let decision = match validate_decision(&envelope, registry) {
            Ok(decision) => decision,
            Err(violation) => {
                warn!(
                    candidate_id = %session.candidate_id,
                    class = ?violation.class(),
                    "Decision rejected: {violation}"
                );
                session.record_violation(&violation);
                if session.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    session.finish(SessionState::Aborted);
                }
                continue;
            }
        };

        session.state = SessionState::Dispatching;
        let outcome = match registry.dispatch(&decision.action, &session.candidate_id, &decision.params)
        {
            Ok(outcome) => outcome,
            Err(unknown) => {
                // Unreachable after validation, but dispatch stays total
                let violation = ProtocolViolation::UnknownAction(unknown.0);
                session.record_violation(&violation);
                if session.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    session.finish(SessionState::Aborted);
                }
                continue;
            }
        };

        if !outcome.is_success() {
            warn!(
                candidate_id = %session.candidate_id,
                action = %decision.action,
                "Handler reported failure: {}",
                outcome.message
            );
        }
        info!(
            candidate_id = %session.candidate_id,
            action = %decision.action,
            iteration = session.iterations,
            "Dispatched action"
        );

        let terminal = registry
            .get(&decision.action)
            .map(|d| d.terminal)
            .unwrap_or(false);
        session.record_dispatch(&decision.action, decision.params, outcome);

        if terminal {
            session.finish(SessionState::Done);
        } else {
            session.state = SessionState::Pending;
        }
    }
}

/// Context for one decision: the résumé, the job requirements, and the
/// previous action's outcome when one exists.
fn build_iteration_context(
    candidate: &CandidateRecord,
    job_requirements: &str,
    session: &AgentSession,
) -> ContextBundle {
    let mut bundle = ContextBundle::new()
        .field("resume", &candidate.resume_text)
        .field("job_requirements", job_requirements);

    if let Some(outcome) = session.last_outcome() {
        bundle = bundle.field(
            "previous_action_result",
            serde_json::to_string(outcome).unwrap_or_default(),
        );
    }
    bundle
}
