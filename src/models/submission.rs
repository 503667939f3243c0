//! Submission validation and remembered-percentage aggregation.
//!
//! A submission is accepted only when every entry has a non-blank question and
//! answer. Accepted submissions produce one percentage per trackable field and
//! one per distinct custom field type.

use super::{Entry, TrackableField};
use crate::error::FieldError;
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Percentages {
    pub question: f64,
    pub answer: f64,
    pub reading: f64,
    pub comprehension: f64,
    /// `(field type, percentage)` in order of first appearance.
    pub custom: Vec<(String, f64)>,
}

impl Percentages {
    pub fn get(&self, field: TrackableField) -> f64 {
        match field {
            TrackableField::Question => self.question,
            TrackableField::Answer => self.answer,
            TrackableField::Reading => self.reading,
            TrackableField::Comprehension => self.comprehension,
        }
    }

    pub fn custom(&self, field_type: &str) -> Option<f64> {
        self.custom
            .iter()
            .find(|(name, _)| name == field_type)
            .map(|(_, value)| *value)
    }

    /// Display lines: the four trackable fields first, then custom types.
    pub fn lines(&self) -> Vec<(String, f64)> {
        TrackableField::ALL
            .iter()
            .map(|&field| (field.name().to_string(), self.get(field)))
            .chain(self.custom.iter().cloned())
            .collect()
    }

    pub fn format_line(name: &str, value: f64) -> String {
        format!("{}: {:.2}%", name, value)
    }
}

/// Diagnostic snapshot of an accepted submission.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmissionRecord {
    pub submitted_at: DateTime<Local>,
    pub entries: Vec<Entry>,
    pub percentages: Percentages,
}

/// Returns one error per blank required field, in display order.
pub fn validate(entries: &[Entry]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for (position, entry) in entries.iter().enumerate() {
        let required = [
            (TrackableField::Question, &entry.question),
            (TrackableField::Answer, &entry.answer),
        ];
        for (field, text) in required {
            if text.trim().is_empty() {
                errors.push(FieldError {
                    entry_id: entry.id,
                    position,
                    field,
                });
            }
        }
    }
    errors
}

/// `count / total * 100`, with an empty total defined as 0%.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

pub fn compute_percentages(entries: &[Entry]) -> Percentages {
    let total = entries.len();
    let count = |field: TrackableField| {
        entries
            .iter()
            .filter(|entry| entry.remembered.get(field))
            .count()
    };

    // (type, carriers, remembered)
    let mut custom_counts: Vec<(String, usize, usize)> = Vec::new();
    for custom_field in entries.iter().flat_map(|entry| &entry.custom_fields) {
        let remembered = usize::from(custom_field.remembered);
        match custom_counts
            .iter_mut()
            .find(|(name, _, _)| *name == custom_field.field_type)
        {
            Some((_, carriers, hits)) => {
                *carriers += 1;
                *hits += remembered;
            }
            None => custom_counts.push((custom_field.field_type.clone(), 1, remembered)),
        }
    }

    Percentages {
        question: percentage(count(TrackableField::Question), total),
        answer: percentage(count(TrackableField::Answer), total),
        reading: percentage(count(TrackableField::Reading), total),
        comprehension: percentage(count(TrackableField::Comprehension), total),
        custom: custom_counts
            .into_iter()
            .map(|(name, carriers, hits)| (name, percentage(hits, carriers)))
            .collect(),
    }
}
