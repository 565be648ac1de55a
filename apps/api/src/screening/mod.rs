// Single-shot structured résumé analysis: one instruction, one schema, one
// gateway call, one envelope back. The decision loop lives in `agent`; this
// module is for callers that want a judgment without a workflow.
// All LLM calls go through llm_client — no direct HTTP here.

pub mod handlers;
pub mod prompts;

use crate::llm_client::context::ContextBundle;
use crate::llm_client::schema::OutputSchemaSpec;
use crate::llm_client::{CompletionEnvelope, CompletionGateway, MODEL};
use crate::models::candidate::CandidateRecord;
use crate::screening::prompts::SCREENING_TEMPERATURE;

/// Runs one structured analysis over a candidate's résumé.
///
/// The caller supplies the instruction and the expected output shape; the
/// result comes back as the gateway's uniform envelope, errors included.
pub async fn analyze_candidate(
    gateway: &dyn CompletionGateway,
    candidate: &CandidateRecord,
    instruction: &str,
    schema: &OutputSchemaSpec,
) -> CompletionEnvelope {
    let context = ContextBundle::new().field("resume", &candidate.resume_text);
    gateway
        .invoke(instruction, &context, schema, MODEL, SCREENING_TEMPERATURE)
        .await
}
