//! Context assembly for LLM prompts.
//!
//! A `ContextBundle` is an ordered set of named text fields rendered into
//! the prompt as upper-cased headers. Oversized fields are truncated at a
//! fixed bound so prompt length stays bounded regardless of input size.

/// Maximum characters of a single context field included in the prompt.
pub const MAX_FIELD_CHARS: usize = 5000;

/// Marker appended to a field that was cut at `MAX_FIELD_CHARS`.
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Ordered mapping of named text fields for prompt context.
///
/// Insertion order is preserved so the rendered prompt is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ContextBundle {
    fields: Vec<(String, String)>,
}

impl ContextBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named field. Returns `self` for chained construction.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Adds a field that may be absent. A missing value renders as empty.
    pub fn optional_field(self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.field(name, value.unwrap_or_default())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders all fields as `NAME:` headers followed by their (possibly
    /// truncated) values. Pure; no failure modes.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.fields {
            out.push('\n');
            out.push_str(&name.to_uppercase());
            out.push_str(":\n");
            out.push_str(&truncate_field(value));
            out.push('\n');
        }
        out
    }
}

/// Cuts a field to its first `MAX_FIELD_CHARS` characters, appending the
/// truncation marker when anything was dropped.
fn truncate_field(value: &str) -> String {
    if value.chars().count() <= MAX_FIELD_CHARS {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(MAX_FIELD_CHARS).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}
