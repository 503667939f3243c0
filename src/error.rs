//! Error types for form transitions and submission export.

use crate::models::{EntryId, TrackableField};
use std::fmt;
use thiserror::Error;

/// A required field left blank on one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub entry_id: EntryId,
    /// Zero-based display position of the entry.
    pub position: usize,
    pub field: TrackableField,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field {}: {} is required", self.position + 1, self.field)
    }
}

/// Rejected transition. The state the transition was applied to is left as is.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("custom field type must not be empty")]
    EmptyCustomFieldType,

    #[error("custom field type '{0}' is already in use")]
    DuplicateCustomFieldType(String),

    #[error("please fill out question and answer for all fields ({} missing)", .0.len())]
    SubmissionRejected(Vec<FieldError>),
}

impl FormError {
    /// Field-level errors carried by a rejected submission.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            FormError::SubmissionRejected(errors) => errors,
            _ => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
