// All LLM prompt constants for the screening module.

use crate::llm_client::schema::OutputSchemaSpec;

/// Slightly higher than the agent temperature: analysis benefits from some
/// variation while staying consistent run to run.
pub const SCREENING_TEMPERATURE: f32 = 0.3;

/// Instruction used when the caller does not supply one.
pub const DEFAULT_SCREENING_INSTRUCTION: &str =
    "Analyze the resume below and assess the candidate's suitability for an engineering role. \
     Be specific and ground every observation in the resume text.";

/// Output shape used when the caller does not supply one.
pub fn default_screening_schema() -> OutputSchemaSpec {
    OutputSchemaSpec::new()
        .key("summary", "string - two sentence summary of the candidate")
        .key(
            "years_of_experience",
            "number - estimated total years of professional experience",
        )
        .key(
            "key_skills",
            "array of strings - the candidate's strongest demonstrated skills",
        )
        .key(
            "concerns",
            "array of strings - gaps or concerns worth noting",
        )
}
