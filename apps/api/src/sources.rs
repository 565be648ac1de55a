//! External data sources loaded once at startup.
//!
//! The résumé table and the job-requirements document are read wholesale
//! into memory and shared read-only for the life of the process. Real
//! ATS/document-store integration lives behind these two functions.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::candidate::CandidateRecord;

/// Loads every candidate row from the résumé CSV into a map keyed by ID.
///
/// Expected header: `ID,Resume_str,Resume_html`. Extra columns are ignored.
pub fn load_resumes(csv_path: impl AsRef<Path>) -> Result<HashMap<String, CandidateRecord>> {
    let csv_path = csv_path.as_ref();
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open resumes CSV at {}", csv_path.display()))?;

    let mut resumes = HashMap::new();
    for row in reader.deserialize() {
        let record: CandidateRecord = row.context("Malformed row in resumes CSV")?;
        resumes.insert(record.id.clone(), record);
    }

    info!(
        "Loaded {} resumes from {}",
        resumes.len(),
        csv_path.display()
    );
    Ok(resumes)
}

/// Reads the job-requirements document (markdown or plain text) into a string.
pub fn load_job_requirements(file_path: impl AsRef<Path>) -> Result<String> {
    let file_path = file_path.as_ref();
    let text = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read job requirements at {}", file_path.display()))?;

    info!(
        "Loaded job requirements ({} chars) from {}",
        text.len(),
        file_path.display()
    );
    Ok(text)
}
