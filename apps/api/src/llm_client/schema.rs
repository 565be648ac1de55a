//! Output schema encoding for structured LLM calls.
//!
//! An `OutputSchemaSpec` describes the JSON object the model must return:
//! each key paired with a natural-language type description. It is rendered
//! into the prompt as a pretty-printed skeleton. The rendering is advisory
//! to the model; the only thing enforced at runtime downstream is key
//! presence.

/// Ordered expected-output keys and their natural-language descriptions.
#[derive(Debug, Clone, Default)]
pub struct OutputSchemaSpec {
    keys: Vec<(String, String)>,
}

impl OutputSchemaSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an expected key with its description. Returns `self` for chaining.
    pub fn key(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.keys.push((name.into(), description.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Renders the expected shape as a pretty-printed JSON object skeleton,
    /// preserving key insertion order.
    pub fn render_skeleton(&self) -> String {
        let mut out = String::from("{\n");
        for (i, (name, description)) in self.keys.iter().enumerate() {
            // serde_json handles quoting/escaping of both sides
            out.push_str("  ");
            out.push_str(&serde_json::to_string(name).unwrap_or_default());
            out.push_str(": ");
            out.push_str(&serde_json::to_string(description).unwrap_or_default());
            if i + 1 < self.keys.len() {
                out.push(',');
            }
            out.push('\n');
        }
        out.push('}');
        out
    }

    /// Renders the full output contract appended to every structured prompt:
    /// the skeleton plus the JSON-only instruction.
    pub fn render_contract(&self) -> String {
        format!(
            "Return a JSON object with this exact structure:\n{}\n\n\
             IMPORTANT: Return ONLY valid JSON, no additional text or markdown formatting.",
            self.render_skeleton()
        )
    }
}
