/// LLM Client — the single point of entry for all model calls in Sift.
///
/// ARCHITECTURAL RULE: No other module may call the completion API
/// directly. All LLM interactions MUST go through this module.
///
/// Every call returns a `CompletionEnvelope`; this module never propagates
/// an error to its caller. Transport failures, bad statuses, and undecodable
/// bodies all become the envelope's `error` field.
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod context;
pub mod schema;

use context::ContextBundle;
use schema::OutputSchemaSpec;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// The model used for all LLM calls in Sift.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "anthropic/claude-3.5-sonnet";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_TOKENS: u32 = 2000;

/// Failure classes captured inside the gateway. Callers only ever see these
/// stringified in `CompletionEnvelope::error`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),
}

/// Uniform return contract of every LLM call.
///
/// Exactly one of `result` / `error` is set; `usage` is empty on failure.
/// Construct only through `success` / `failure` so the invariant holds.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionEnvelope {
    pub result: Option<Value>,
    pub error: Option<String>,
    pub usage: BTreeMap<String, u64>,
}

impl CompletionEnvelope {
    pub fn success(result: Value, usage: BTreeMap<String, u64>) -> Self {
        Self {
            result: Some(result),
            error: None,
            usage,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            result: None,
            error: Some(error.to_string()),
            usage: BTreeMap::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

/// The completion gateway seam. Production code uses `LlmClient`; tests
/// inject scripted doubles.
///
/// Carried in `AppState` as `Arc<dyn CompletionGateway>`.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Sends one structured completion request and normalizes the outcome.
    /// Total function: every failure path lands in the envelope.
    async fn invoke(
        &self,
        instruction: &str,
        context: &ContextBundle,
        schema: &OutputSchemaSpec,
        model: &str,
        temperature: f32,
    ) -> CompletionEnvelope;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Production client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services in Sift. Wraps the OpenRouter
/// chat-completions endpoint in JSON mode.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionGateway for LlmClient {
    async fn invoke(
        &self,
        instruction: &str,
        context: &ContextBundle,
        schema: &OutputSchemaSpec,
        model: &str,
        temperature: f32,
    ) -> CompletionEnvelope {
        let prompt = build_prompt(instruction, context, schema);

        let request_body = ChatCompletionRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = match self
            .client
            .post(OPENROUTER_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("LLM request failed before a response arrived: {e}");
                return CompletionEnvelope::failure(GatewayError::Network(e.to_string()));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                return CompletionEnvelope::failure(GatewayError::Network(e.to_string()));
            }
        };

        if !status.is_success() {
            // Prefer the provider's error message when the body carries one
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {status}: {message}");
            return CompletionEnvelope::failure(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = parse_completion_body(&body);
        if envelope.is_success() {
            debug!("LLM call succeeded: usage={:?}", envelope.usage);
        }
        envelope
    }
}

/// Assembles the full prompt: instruction, then context, then the output
/// contract.
fn build_prompt(instruction: &str, context: &ContextBundle, schema: &OutputSchemaSpec) -> String {
    format!(
        "{instruction}\n{}\n{}",
        context.render(),
        schema.render_contract()
    )
}

/// Parses a successful HTTP body into an envelope. Split from `invoke` so
/// decode failures are testable without a network.
fn parse_completion_body(body: &str) -> CompletionEnvelope {
    let parsed: ChatCompletionResponse = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) => {
            return CompletionEnvelope::failure(GatewayError::Decode(format!(
                "response body is not a valid completion: {e}"
            )));
        }
    };

    let Some(choice) = parsed.choices.first() else {
        return CompletionEnvelope::failure(GatewayError::Decode(
            "response contained no choices".to_string(),
        ));
    };

    let result: Value = match serde_json::from_str(&choice.message.content) {
        Ok(v) => v,
        Err(e) => {
            return CompletionEnvelope::failure(GatewayError::Decode(format!(
                "completion content is not valid JSON: {e}"
            )));
        }
    };

    CompletionEnvelope::success(result, extract_usage(parsed.usage))
}

/// Copies integer-valued token counters from the provider's `usage` object.
/// Non-integer or missing entries are dropped, never an error.
fn extract_usage(usage: Option<Value>) -> BTreeMap<String, u64> {
    let mut counters = BTreeMap::new();
    if let Some(Value::Object(map)) = usage {
        for (key, value) in map {
            if let Some(count) = value.as_u64() {
                counters.insert(key, count);
            }
        }
    }
    counters
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_has_result_and_no_error() {
        let envelope = CompletionEnvelope::success(json!({"action": "done"}), BTreeMap::new());
        assert!(envelope.is_success());
        assert!(envelope.result.is_some());
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_failure_envelope_has_error_empty_usage_no_result() {
        let envelope = CompletionEnvelope::failure(GatewayError::Network("timed out".into()));
        assert!(!envelope.is_success());
        assert!(envelope.result.is_none());
        assert_eq!(envelope.error.as_deref(), Some("network error: timed out"));
        assert!(envelope.usage.is_empty());
    }

    #[test]
    fn test_build_prompt_orders_instruction_context_contract() {
        let context = ContextBundle::new().field("resume", "resume body");
        let schema = OutputSchemaSpec::new().key("action", "string");
        let prompt = build_prompt("Screen this candidate.", &context, &schema);

        let instruction_at = prompt.find("Screen this candidate.").unwrap();
        let context_at = prompt.find("RESUME:").unwrap();
        let contract_at = prompt.find("Return a JSON object").unwrap();
        assert!(instruction_at < context_at);
        assert!(context_at < contract_at);
    }

    #[test]
    fn test_parse_completion_body_success_extracts_result_and_usage() {
        let body = json!({
            "choices": [{"message": {"content": "{\"action\": \"done\"}"}}],
            "usage": {"prompt_tokens": 812, "completion_tokens": 44, "total_tokens": 856}
        })
        .to_string();

        let envelope = parse_completion_body(&body);
        assert!(envelope.is_success());
        assert_eq!(envelope.result.unwrap()["action"], "done");
        assert_eq!(envelope.usage["prompt_tokens"], 812);
        assert_eq!(envelope.usage["total_tokens"], 856);
    }

    #[test]
    fn test_parse_completion_body_rejects_non_json_body() {
        let envelope = parse_completion_body("<html>bad gateway</html>");
        assert!(!envelope.is_success());
        assert!(envelope.error.unwrap().contains("decode error"));
        assert!(envelope.usage.is_empty());
    }

    #[test]
    fn test_parse_completion_body_rejects_empty_choices() {
        let body = json!({"choices": []}).to_string();
        let envelope = parse_completion_body(&body);
        assert!(envelope.error.unwrap().contains("no choices"));
    }

    #[test]
    fn test_parse_completion_body_rejects_non_json_content() {
        let body = json!({
            "choices": [{"message": {"content": "not json"}}],
            "usage": {"total_tokens": 99}
        })
        .to_string();

        let envelope = parse_completion_body(&body);
        assert!(!envelope.is_success());
        assert!(envelope
            .error
            .unwrap()
            .contains("completion content is not valid JSON"));
        // Usage from a failed call is never surfaced
        assert!(envelope.usage.is_empty());
    }

    #[test]
    fn test_extract_usage_keeps_only_integer_counters() {
        let usage = json!({
            "prompt_tokens": 100,
            "completion_tokens": 20,
            "cost": 0.0013,
            "model": "anthropic/claude-3.5-sonnet"
        });
        let counters = extract_usage(Some(usage));
        assert_eq!(counters.len(), 2);
        assert_eq!(counters["completion_tokens"], 20);
    }

    #[test]
    fn test_extract_usage_missing_is_empty() {
        assert!(extract_usage(None).is_empty());
        assert!(extract_usage(Some(json!("n/a"))).is_empty());
    }
}
