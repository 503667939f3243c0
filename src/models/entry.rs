//! Entry is one field group of the form: question, answer, reading, comprehension
//! and any number of user-defined custom fields.
use super::RememberedFlags;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-defined `{type, value}` pair attached to an entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomField {
    pub field_type: String,
    pub value: String,
    pub remembered: bool,
}

impl CustomField {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            value: String::new(),
            remembered: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entry {
    pub id: EntryId,
    pub question: String,
    pub answer: String,
    pub reading: String,
    pub comprehension: String,
    pub custom_fields: Vec<CustomField>,
    pub remembered: RememberedFlags,
}

impl Entry {
    /// Creates an empty entry with a fresh id and every flag cleared.
    pub fn new() -> Self {
        Self {
            id: EntryId::new(),
            question: String::new(),
            answer: String::new(),
            reading: String::new(),
            comprehension: String::new(),
            custom_fields: Vec::new(),
            remembered: RememberedFlags::default(),
        }
    }

    pub fn has_custom_type(&self, field_type: &str) -> bool {
        self.custom_fields.iter().any(|cf| cf.field_type == field_type)
    }

    /// Merges the fields set in `patch`, leaving the rest untouched.
    pub fn apply_patch(&mut self, patch: EntryPatch) {
        if let Some(question) = patch.question {
            self.question = question;
        }
        if let Some(answer) = patch.answer {
            self.answer = answer;
        }
        if let Some(reading) = patch.reading {
            self.reading = reading;
        }
        if let Some(comprehension) = patch.comprehension {
            self.comprehension = comprehension;
        }
    }
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update for the four fixed text fields of an entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub reading: Option<String>,
    pub comprehension: Option<String>,
}

impl EntryPatch {
    pub fn question(value: impl Into<String>) -> Self {
        Self {
            question: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn answer(value: impl Into<String>) -> Self {
        Self {
            answer: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn reading(value: impl Into<String>) -> Self {
        Self {
            reading: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn comprehension(value: impl Into<String>) -> Self {
        Self {
            comprehension: Some(value.into()),
            ..Default::default()
        }
    }
}
