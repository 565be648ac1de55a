use serde::{Deserialize, Serialize};

/// A single candidate row from the résumé table.
///
/// Field names map 1:1 onto the CSV header (`ID`, `Resume_str`,
/// `Resume_html`). Immutable once loaded; the screening pipeline only ever
/// borrows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "ID")]
    pub id: String,
    /// Plain-text résumé body. This is what goes into LLM context.
    #[serde(rename = "Resume_str")]
    pub resume_text: String,
    /// Original HTML markup of the résumé. Kept for display, never prompted.
    #[serde(rename = "Resume_html")]
    pub resume_markup: String,
}
