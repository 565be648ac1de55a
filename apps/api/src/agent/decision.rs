//! Decision parsing and validation.
//!
//! Sits between the completion gateway and dispatch: a raw envelope goes in,
//! a validated `(action, params)` pair comes out, or a `ProtocolViolation`
//! naming exactly what the model got wrong. No handler runs until
//! validation passes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::actions::{ActionRegistry, ParamMap};
use crate::llm_client::CompletionEnvelope;

/// Coarse failure class recorded in session history alongside the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationClass {
    /// The gateway itself failed (network, API status, or undecodable body).
    GatewayFailure,
    /// The model returned JSON that does not follow the decision contract.
    SchemaViolation,
    /// The model named an action outside the registry.
    UnknownAction,
}

/// A protocol violation: the decision cannot be dispatched. These are
/// distinct from business decisions; no handler is ever invoked for them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolViolation {
    #[error("gateway failure: {0}")]
    GatewayFailure(String),

    #[error("model output is not a JSON object")]
    NotAnObject,

    #[error("model output is missing a string \"action\" key")]
    MissingAction,

    #[error("model chose unknown action \"{0}\"")]
    UnknownAction(String),

    #[error("action \"{action}\" is missing required parameter \"{parameter}\"")]
    MissingParameter { action: String, parameter: String },
}

impl ProtocolViolation {
    pub fn class(&self) -> ViolationClass {
        match self {
            ProtocolViolation::GatewayFailure(_) => ViolationClass::GatewayFailure,
            ProtocolViolation::NotAnObject
            | ProtocolViolation::MissingAction
            | ProtocolViolation::MissingParameter { .. } => ViolationClass::SchemaViolation,
            ProtocolViolation::UnknownAction(_) => ViolationClass::UnknownAction,
        }
    }
}

/// A decision that passed validation and is ready for dispatch.
///
/// `params` holds exactly the declared parameters of the chosen action;
/// undeclared keys the model added (e.g. its reasoning) are dropped here.
#[derive(Debug, Clone)]
pub struct Decision {
    pub action: String,
    pub params: ParamMap,
}

/// Validates an envelope against the registry.
///
/// Checks, in order: the envelope carries a result; the result is an
/// object; it names an action; the action is registered; every declared
/// parameter of that action is present. Presence is the only type check.
pub fn validate_decision(
    envelope: &CompletionEnvelope,
    registry: &ActionRegistry,
) -> Result<Decision, ProtocolViolation> {
    if let Some(error) = &envelope.error {
        return Err(ProtocolViolation::GatewayFailure(error.clone()));
    }
    let Some(result) = &envelope.result else {
        return Err(ProtocolViolation::GatewayFailure(
            "envelope carried neither result nor error".to_string(),
        ));
    };

    let Some(object) = result.as_object() else {
        return Err(ProtocolViolation::NotAnObject);
    };

    let Some(action) = object.get("action").and_then(|v| v.as_str()) else {
        return Err(ProtocolViolation::MissingAction);
    };

    let Some(descriptor) = registry.get(action) else {
        return Err(ProtocolViolation::UnknownAction(action.to_string()));
    };

    let mut params = ParamMap::new();
    for parameter in &descriptor.parameters {
        let Some(value) = object.get(&parameter.name) else {
            return Err(ProtocolViolation::MissingParameter {
                action: action.to_string(),
                parameter: parameter.name.clone(),
            });
        };
        params.insert(parameter.name.clone(), value.clone());
    }

    Ok(Decision {
        action: action.to_string(),
        params,
    })
}
