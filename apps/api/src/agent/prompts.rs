// All LLM prompt constants for the agent module. The action catalog is
// rendered from the live registry so prompt and dispatch can never drift.

use crate::agent::actions::ActionRegistry;
use crate::llm_client::schema::OutputSchemaSpec;

/// Low temperature: routing decisions should be consistent, not creative.
pub const AGENT_TEMPERATURE: f32 = 0.2;

/// Decision instruction. Replace `{catalog}` with `render_catalog` output.
const DECISION_INSTRUCTION_TEMPLATE: &str = r#"You are an application routing agent for an engineering hiring pipeline.
Review the candidate's resume against the job requirements, together with the result of the previous action if one is shown, and choose the single next action to take for this candidate.

You may only choose from the actions listed below. The candidate_id is supplied automatically; do NOT include it in your response.

AVAILABLE ACTIONS:
{catalog}

In addition to "action" and "reasoning", include each parameter declared for the chosen action as a top-level key in the JSON object.
Choose exactly one action per response. When no further automated action is needed, choose "done"."#;

/// Renders the registry as the allowed vocabulary for the model: one block
/// per action with its description and declared parameters.
pub fn render_catalog(registry: &ActionRegistry) -> String {
    let mut out = String::new();
    for action in registry.iter() {
        out.push_str(&format!("- {}: {}\n", action.name, action.description));
        if action.parameters.is_empty() {
            out.push_str("  parameters: (none)\n");
        } else {
            out.push_str("  parameters:\n");
            for parameter in &action.parameters {
                out.push_str(&format!(
                    "    - {}: {}\n",
                    parameter.name, parameter.description
                ));
            }
        }
    }
    out
}

/// Builds the full decision instruction for one loop iteration.
pub fn build_decision_instruction(registry: &ActionRegistry) -> String {
    DECISION_INSTRUCTION_TEMPLATE.replace("{catalog}", &render_catalog(registry))
}

/// The expected shape of a decision response.
pub fn decision_schema() -> OutputSchemaSpec {
    OutputSchemaSpec::new()
        .key("action", "string - name of the chosen action")
        .key(
            "reasoning",
            "string - one or two sentences explaining why this action was chosen",
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::actions::default_registry;

    #[test]
    fn test_catalog_lists_every_action_with_description() {
        let registry = default_registry();
        let catalog = render_catalog(&registry);

        for action in registry.iter() {
            assert!(catalog.contains(&format!("- {}:", action.name)));
            assert!(catalog.contains(&action.description));
        }
    }

    #[test]
    fn test_catalog_renders_parameters_with_descriptions() {
        let catalog = render_catalog(&default_registry());
        assert!(catalog.contains("- reason: string - Reason for rejection"));
        assert!(catalog.contains("- assessment_type: string - Type of assessment"));
    }

    #[test]
    fn test_parameterless_action_renders_none_marker() {
        let catalog = render_catalog(&default_registry());
        assert!(catalog.contains("parameters: (none)"));
    }

    #[test]
    fn test_instruction_embeds_catalog_and_rules() {
        let instruction = build_decision_instruction(&default_registry());
        assert!(!instruction.contains("{catalog}"));
        assert!(instruction.contains("- done:"));
        assert!(instruction.contains("candidate_id is supplied automatically"));
        assert!(instruction.contains("Choose exactly one action"));
    }

    #[test]
    fn test_decision_schema_requires_action_key() {
        let skeleton = decision_schema().render_skeleton();
        assert!(skeleton.contains("\"action\""));
        assert!(skeleton.contains("\"reasoning\""));
    }
}
