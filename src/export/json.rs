//! JSON export of accepted submissions.
//! Writes the diagnostic record of a submission to a file on request; nothing is read back.

use crate::error::ExportError;
use crate::models::SubmissionRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn submission_to_json(record: &SubmissionRecord) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Exports a submission record to a JSON file at the specified path.
/// Returns an error if serialization, file creation or writing fails.
pub fn export_submission_to_path(record: &SubmissionRecord, path: &Path) -> Result<(), ExportError> {
    let json_string = submission_to_json(record)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    tracing::info!("submission exported to '{}'", path.display());
    Ok(())
}
