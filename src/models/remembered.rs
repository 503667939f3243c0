//! Per-entry "remembered" flags for the four trackable sub-fields.
use serde::Serialize;
use std::fmt;

/// Sub-field eligible for remembered tracking and percentage aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackableField {
    Question,
    Answer,
    Reading,
    Comprehension,
}

impl TrackableField {
    pub const ALL: [TrackableField; 4] = [
        TrackableField::Question,
        TrackableField::Answer,
        TrackableField::Reading,
        TrackableField::Comprehension,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TrackableField::Question => "question",
            TrackableField::Answer => "answer",
            TrackableField::Reading => "reading",
            TrackableField::Comprehension => "comprehension",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackableField::Question => "Question",
            TrackableField::Answer => "Answer",
            TrackableField::Reading => "Reading",
            TrackableField::Comprehension => "Comprehension",
        }
    }
}

impl fmt::Display for TrackableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RememberedFlags {
    pub question: bool,
    pub answer: bool,
    pub reading: bool,
    pub comprehension: bool,
}

impl RememberedFlags {
    pub fn get(&self, field: TrackableField) -> bool {
        match field {
            TrackableField::Question => self.question,
            TrackableField::Answer => self.answer,
            TrackableField::Reading => self.reading,
            TrackableField::Comprehension => self.comprehension,
        }
    }

    pub fn set(&mut self, field: TrackableField, value: bool) {
        match field {
            TrackableField::Question => self.question = value,
            TrackableField::Answer => self.answer = value,
            TrackableField::Reading => self.reading = value,
            TrackableField::Comprehension => self.comprehension = value,
        }
    }

    pub fn toggle(&mut self, field: TrackableField) {
        self.set(field, !self.get(field));
    }
}
