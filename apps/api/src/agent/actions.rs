//! Action catalog for the screening agent.
//!
//! The registry is an immutable catalog built once at startup and shared by
//! reference into every decision loop. Handlers are pure functions of
//! `(candidate_id, params)` returning canned outcomes; real side effects
//! (ATS, calendar, email delivery) belong behind these signatures and are
//! out of scope here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Parameter values a decision carries for one action.
pub type ParamMap = serde_json::Map<String, Value>;

/// Dates stamped into mock outcomes. Real integrations would produce these.
const MOCK_ASSESSMENT_DATE: &str = "2024-02-15";
const MOCK_DISPATCH_DATE: &str = "2024-02-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Failure,
}

/// Result of dispatching one action.
///
/// `details` carries the action-specific fields (department, reason,
/// scheduled_date, ...) and serializes flattened next to status/message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub status: ActionStatus,
    pub message: String,
    #[serde(flatten)]
    pub details: ParamMap,
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Success,
            message: message.into(),
            details: ParamMap::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Failure,
            message: message.into(),
            details: ParamMap::new(),
        }
    }

    /// Attaches an action-specific detail field. Returns `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }
}

/// One declared parameter of an action: name plus the type-and-meaning text
/// rendered into the prompt. This is the only wire format the model must
/// honor for action selection.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub description: String,
}

pub type ActionHandler = Box<dyn Fn(&str, &ParamMap) -> ActionOutcome + Send + Sync>;

/// A named action the model may select: description and parameters feed the
/// prompt; the handler runs on dispatch. `terminal` marks the action that
/// ends a session (only `done` in the default catalog).
pub struct ActionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    pub terminal: bool,
    handler: ActionHandler,
}

impl std::fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

impl ActionDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl Fn(&str, &ParamMap) -> ActionOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            terminal: false,
            handler: Box::new(handler),
        }
    }

    /// Declares a required parameter. Returns `self` for chaining.
    pub fn param(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.parameters.push(ParameterSpec {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Marks this action as terminal: dispatching it ends the session.
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    pub fn invoke(&self, candidate_id: &str, params: &ParamMap) -> ActionOutcome {
        (self.handler)(candidate_id, params)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate action name \"{0}\"")]
    DuplicateName(String),
}

/// Dispatch-time lookup miss. Handled by the decision loop as a protocol
/// error, never by invoking a default action.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action \"{0}\"")]
pub struct UnknownAction(pub String);

/// Immutable catalog of actions. No entry may be added or removed after
/// construction; iteration order is insertion order so catalog rendering is
/// deterministic.
#[derive(Debug)]
pub struct ActionRegistry {
    actions: Vec<ActionDescriptor>,
}

impl ActionRegistry {
    pub fn new(actions: Vec<ActionDescriptor>) -> Result<Self, RegistryError> {
        for (i, action) in actions.iter().enumerate() {
            if actions[..i].iter().any(|a| a.name == action.name) {
                return Err(RegistryError::DuplicateName(action.name.clone()));
            }
        }
        Ok(Self { actions })
    }

    pub fn get(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Looks up the named action and invokes its handler with the candidate
    /// id and the decision's parameters.
    pub fn dispatch(
        &self,
        name: &str,
        candidate_id: &str,
        params: &ParamMap,
    ) -> Result<ActionOutcome, UnknownAction> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| UnknownAction(name.to_string()))?;
        Ok(descriptor.invoke(candidate_id, params))
    }
}

/// Reads a parameter as text. Validation upstream guarantees presence but
/// not type; non-string values are rendered through their JSON form.
fn param_text(params: &ParamMap, name: &str) -> String {
    match params.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Builds the default seven-action screening catalog.
pub fn default_registry() -> ActionRegistry {
    let actions = vec![
        ActionDescriptor::new(
            "schedule_technical_assessment",
            "Schedule a technical assessment (coding challenge, system design, etc.) for a promising candidate",
            |candidate_id, params| {
                let assessment_type = param_text(params, "assessment_type");
                ActionOutcome::success(format!(
                    "Technical assessment ({assessment_type}) scheduled for candidate {candidate_id}"
                ))
                .with("assessment_type", assessment_type)
                .with("scheduled_date", MOCK_ASSESSMENT_DATE)
            },
        )
        .param(
            "assessment_type",
            "string - Type of assessment: 'coding_challenge', 'system_design', 'live_coding'",
        ),
        ActionDescriptor::new(
            "route_to_department",
            "Route candidate to a specific department or hiring manager for further review",
            |candidate_id, params| {
                let department = param_text(params, "department");
                ActionOutcome::success(format!(
                    "Candidate {candidate_id} routed to {department}"
                ))
                .with("department", department)
                .with("reason", param_text(params, "reason"))
            },
        )
        .param(
            "department",
            "string - Department name: 'senior_engineering', 'junior_engineering', 'internship'",
        )
        .param("reason", "string - Reason for routing to this department"),
        ActionDescriptor::new(
            "request_additional_info",
            "Request additional information from the candidate (e.g., missing education details, clarification)",
            |candidate_id, params| {
                ActionOutcome::success(format!(
                    "Additional info requested from candidate {candidate_id}"
                ))
                .with("info_needed", param_text(params, "info_needed"))
                .with("request_sent_date", MOCK_DISPATCH_DATE)
            },
        )
        .param("info_needed", "string - Description of what information is needed"),
        ActionDescriptor::new(
            "reject_application",
            "Reject the candidate's application with a reason",
            |candidate_id, params| {
                ActionOutcome::success(format!(
                    "Application rejected for candidate {candidate_id}"
                ))
                .with("reason", param_text(params, "reason"))
                .with("rejection_email_sent", true)
            },
        )
        .param(
            "reason",
            "string - Reason for rejection (be professional and constructive)",
        ),
        ActionDescriptor::new(
            "flag_for_manual_review",
            "Flag candidate for manual human review when uncertain or edge case",
            |candidate_id, params| {
                ActionOutcome::success(format!(
                    "Candidate {candidate_id} flagged for manual review"
                ))
                .with("concern", param_text(params, "concern"))
                .with("assigned_to", "hiring_manager")
            },
        )
        .param("concern", "string - Description of what requires human judgment"),
        ActionDescriptor::new(
            "send_email",
            "Send an email to the candidate using a template",
            |candidate_id, params| {
                ActionOutcome::success(format!("Email sent to candidate {candidate_id}"))
                    .with("template", param_text(params, "template"))
                    .with("sent_date", MOCK_DISPATCH_DATE)
            },
        )
        .param(
            "template",
            "string - Template name: 'technical_interview_invite', 'rejection', 'request_info'",
        ),
        ActionDescriptor::new(
            "done",
            "Signal that processing is complete for this candidate. Call this when no further automated actions are needed.",
            |candidate_id, _params| {
                ActionOutcome::success(format!(
                    "Processing complete for candidate {candidate_id}"
                ))
                .with("final", true)
            },
        )
        .terminal(),
    ];

    ActionRegistry::new(actions).expect("default action catalog has unique names")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_default_registry_has_seven_actions() {
        let registry = default_registry();
        assert_eq!(registry.len(), 7);
        for name in [
            "schedule_technical_assessment",
            "route_to_department",
            "request_additional_info",
            "reject_application",
            "flag_for_manual_review",
            "send_email",
            "done",
        ] {
            assert!(registry.get(name).is_some(), "missing action {name}");
        }
    }

    #[test]
    fn test_done_is_the_only_terminal_action() {
        let registry = default_registry();
        let terminals: Vec<&str> = registry
            .iter()
            .filter(|a| a.terminal)
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(terminals, vec!["done"]);
    }

    #[test]
    fn test_duplicate_names_rejected_at_construction() {
        let actions = vec![
            ActionDescriptor::new("done", "first", |_, _| ActionOutcome::success("a")),
            ActionDescriptor::new("done", "second", |_, _| ActionOutcome::success("b")),
        ];
        let err = ActionRegistry::new(actions).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("done".to_string()));
    }

    #[test]
    fn test_dispatch_unknown_action_is_error_not_default() {
        let registry = default_registry();
        let err = registry
            .dispatch("schedule_interview", "C1", &ParamMap::new())
            .unwrap_err();
        assert_eq!(err, UnknownAction("schedule_interview".to_string()));
    }

    #[test]
    fn test_reject_application_outcome_reports_email_sent() {
        let registry = default_registry();
        let outcome = registry
            .dispatch(
                "reject_application",
                "C42",
                &params(&[("reason", json!("skills mismatch"))]),
            )
            .unwrap();

        assert!(outcome.is_success());
        assert!(outcome.message.contains("C42"));
        assert_eq!(outcome.details["reason"], "skills mismatch");
        assert_eq!(outcome.details["rejection_email_sent"], true);
    }

    #[test]
    fn test_schedule_assessment_outcome_carries_type_and_date() {
        let registry = default_registry();
        let outcome = registry
            .dispatch(
                "schedule_technical_assessment",
                "C7",
                &params(&[("assessment_type", json!("system_design"))]),
            )
            .unwrap();

        assert_eq!(outcome.details["assessment_type"], "system_design");
        assert_eq!(outcome.details["scheduled_date"], MOCK_ASSESSMENT_DATE);
    }

    #[test]
    fn test_done_outcome_is_final() {
        let registry = default_registry();
        let outcome = registry.dispatch("done", "C9", &ParamMap::new()).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.details["final"], true);
    }

    #[test]
    fn test_dispatch_is_idempotent_per_call() {
        let registry = default_registry();
        let p = params(&[("department", json!("senior_engineering")), ("reason", json!("strong fit"))]);

        let first = registry.dispatch("route_to_department", "C1", &p).unwrap();
        let second = registry.dispatch("route_to_department", "C1", &p).unwrap();

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_non_string_param_is_rendered_not_rejected() {
        let registry = default_registry();
        let outcome = registry
            .dispatch(
                "reject_application",
                "C3",
                &params(&[("reason", json!(42))]),
            )
            .unwrap();
        assert_eq!(outcome.details["reason"], "42");
    }

    #[test]
    fn test_outcome_serializes_details_flattened() {
        let outcome = ActionOutcome::success("ok").with("department", "internship");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["department"], "internship");
        assert!(value.get("details").is_none());
    }
}
