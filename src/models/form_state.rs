//! Form state and its transitions.
//!
//! Every transition takes the current state by reference and returns the next
//! one. Rejected transitions return a [`FormError`] and leave the caller's
//! state untouched, so a failed submit or custom-field add never changes
//! anything.

use super::submission::{self, Percentages, SubmissionRecord};
use super::{CustomField, Entry, EntryId, EntryPatch, RememberedFlags, TrackableField};
use crate::error::{FieldError, FormError};
use chrono::Local;

/// One user action on the form.
#[derive(Clone, Debug, PartialEq)]
pub enum FormAction {
    AddEntry,
    DeleteEntry(EntryId),
    UpdateEntry(EntryId, EntryPatch),
    AddCustomField { entry_id: EntryId, type_name: String },
    UpdateCustomFieldValue { entry_id: EntryId, index: usize, value: String },
    RemoveCustomField { entry_id: EntryId, index: usize },
    ToggleRemembered { entry_id: EntryId, field: TrackableField },
    ToggleCustomRemembered { entry_id: EntryId, index: usize },
    Submit,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    entries: Vec<Entry>,
    last_submission: Option<SubmissionRecord>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Flags record of an entry; `None` once the entry is deleted.
    pub fn remembered(&self, id: EntryId) -> Option<&RememberedFlags> {
        self.entry(id).map(|entry| &entry.remembered)
    }

    /// Percentages of the last accepted submission.
    pub fn percentages(&self) -> Option<&Percentages> {
        self.last_submission.as_ref().map(|record| &record.percentages)
    }

    pub fn last_submission(&self) -> Option<&SubmissionRecord> {
        self.last_submission.as_ref()
    }

    /// Required fields that are currently blank, in display order.
    pub fn field_errors(&self) -> Vec<FieldError> {
        submission::validate(&self.entries)
    }

    /// Re-evaluates an earlier rejection against the current entries.
    ///
    /// A rejected submission keeps only the field errors that still apply and
    /// disappears once none do. Other errors are returned as they are.
    pub fn recheck(&self, error: FormError) -> Option<FormError> {
        match error {
            FormError::SubmissionRejected(_) => {
                let errors = self.field_errors();
                (!errors.is_empty()).then_some(FormError::SubmissionRejected(errors))
            }
            other => Some(other),
        }
    }

    /// Applies one action and returns the resulting state.
    pub fn reduce(&self, action: FormAction) -> Result<FormState, FormError> {
        tracing::debug!(?action, "applying form action");

        let result = match action {
            FormAction::AddEntry => Ok(self.add_entry()),
            FormAction::DeleteEntry(id) => Ok(self.delete_entry(id)),
            FormAction::UpdateEntry(id, patch) => Ok(self.update_entry(id, patch)),
            FormAction::AddCustomField {
                entry_id,
                type_name,
            } => self.add_custom_field(entry_id, &type_name),
            FormAction::UpdateCustomFieldValue {
                entry_id,
                index,
                value,
            } => Ok(self.update_custom_field_value(entry_id, index, value)),
            FormAction::RemoveCustomField { entry_id, index } => {
                Ok(self.remove_custom_field(entry_id, index))
            }
            FormAction::ToggleRemembered { entry_id, field } => {
                Ok(self.toggle_remembered(entry_id, field))
            }
            FormAction::ToggleCustomRemembered { entry_id, index } => {
                Ok(self.toggle_custom_remembered(entry_id, index))
            }
            FormAction::Submit => self.submit(),
        };

        if let Err(e) = &result {
            tracing::warn!("form action rejected: {e}");
        }
        result
    }

    /// Appends an empty entry with a fresh id and cleared flags.
    pub fn add_entry(&self) -> FormState {
        let mut next = self.clone();
        next.entries.push(Entry::new());
        next
    }

    /// Removes the entry together with its flags. Unknown ids are ignored.
    pub fn delete_entry(&self, id: EntryId) -> FormState {
        let mut next = self.clone();
        next.entries.retain(|entry| entry.id != id);
        next
    }

    pub fn update_entry(&self, id: EntryId, patch: EntryPatch) -> FormState {
        self.with_entry(id, |entry| entry.apply_patch(patch))
    }

    /// Adds a custom field to `entry_id`.
    ///
    /// The trimmed type name must be non-empty and must not be used by any
    /// custom field of any entry in the form.
    pub fn add_custom_field(&self, entry_id: EntryId, type_name: &str) -> Result<FormState, FormError> {
        let field_type = type_name.trim();
        if field_type.is_empty() {
            return Err(FormError::EmptyCustomFieldType);
        }
        if self.entries.iter().any(|entry| entry.has_custom_type(field_type)) {
            return Err(FormError::DuplicateCustomFieldType(field_type.to_string()));
        }

        Ok(self.with_entry(entry_id, |entry| {
            entry.custom_fields.push(CustomField::new(field_type));
        }))
    }

    pub fn update_custom_field_value(&self, entry_id: EntryId, index: usize, value: String) -> FormState {
        self.with_entry(entry_id, |entry| {
            if let Some(custom_field) = entry.custom_fields.get_mut(index) {
                custom_field.value = value;
            }
        })
    }

    pub fn remove_custom_field(&self, entry_id: EntryId, index: usize) -> FormState {
        self.with_entry(entry_id, |entry| {
            if index < entry.custom_fields.len() {
                entry.custom_fields.remove(index);
            }
        })
    }

    pub fn toggle_remembered(&self, entry_id: EntryId, field: TrackableField) -> FormState {
        self.with_entry(entry_id, |entry| entry.remembered.toggle(field))
    }

    pub fn toggle_custom_remembered(&self, entry_id: EntryId, index: usize) -> FormState {
        self.with_entry(entry_id, |entry| {
            if let Some(custom_field) = entry.custom_fields.get_mut(index) {
                custom_field.remembered = !custom_field.remembered;
            }
        })
    }

    /// Validates every entry and, if all pass, recomputes the percentages.
    ///
    /// The accepted submission is logged as a diagnostic record and kept as
    /// the state's last submission.
    pub fn submit(&self) -> Result<FormState, FormError> {
        let errors = self.field_errors();
        if !errors.is_empty() {
            return Err(FormError::SubmissionRejected(errors));
        }

        let record = SubmissionRecord {
            submitted_at: Local::now(),
            entries: self.entries.clone(),
            percentages: submission::compute_percentages(&self.entries),
        };

        match serde_json::to_string(&record.entries) {
            Ok(json) => tracing::info!(entries = self.entries.len(), "fields submitted: {json}"),
            Err(e) => tracing::warn!("could not serialize submitted fields: {e}"),
        }

        let mut next = self.clone();
        next.last_submission = Some(record);
        Ok(next)
    }

    fn with_entry(&self, id: EntryId, f: impl FnOnce(&mut Entry)) -> FormState {
        let mut next = self.clone();
        if let Some(entry) = next.entries.iter_mut().find(|entry| entry.id == id) {
            f(entry);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_entries(n: usize) -> FormState {
        (0..n).fold(FormState::new(), |state, _| state.add_entry())
    }

    fn ids(state: &FormState) -> Vec<EntryId> {
        state.entries().iter().map(|entry| entry.id).collect()
    }

    fn filled(state: FormState, id: EntryId, question: &str, answer: &str) -> FormState {
        state.update_entry(
            id,
            EntryPatch {
                question: Some(question.to_string()),
                answer: Some(answer.to_string()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_add_entries_in_order_with_unique_ids() {
        let state = state_with_entries(5);
        let ids = ids(&state);

        assert_eq!(ids.len(), 5);
        for (i, id) in ids.iter().enumerate() {
            assert!(!ids[i + 1..].contains(id));
            assert_eq!(state.remembered(*id), Some(&RememberedFlags::default()));
        }
    }

    #[test]
    fn test_add_entry_leaves_previous_state_untouched() {
        let state = state_with_entries(1);
        let next = state.add_entry();

        assert_eq!(state.entries().len(), 1);
        assert_eq!(next.entries().len(), 2);
        assert_eq!(next.entries()[0], state.entries()[0]);
    }

    #[test]
    fn test_delete_entry_preserves_order_and_drops_flags() {
        let state = state_with_entries(3);
        let before = ids(&state);

        let next = state.delete_entry(before[1]);

        assert_eq!(ids(&next), vec![before[0], before[2]]);
        assert!(next.remembered(before[1]).is_none());
        assert!(next.entry(before[1]).is_none());
    }

    #[test]
    fn test_delete_unknown_entry_is_noop() {
        let state = state_with_entries(2);
        assert_eq!(state.delete_entry(EntryId::new()), state);
    }

    #[test]
    fn test_update_entry_merges_fields() {
        let state = state_with_entries(2);
        let id = state.entries()[0].id;

        let next = state
            .update_entry(id, EntryPatch::question("Q1"))
            .update_entry(id, EntryPatch::reading("よみ"));

        let entry = next.entry(id).unwrap();
        assert_eq!(entry.question, "Q1");
        assert_eq!(entry.reading, "よみ");
        assert_eq!(entry.answer, "");
        assert_eq!(next.entries()[1], state.entries()[1]);
    }

    #[test]
    fn test_update_unknown_entry_is_noop() {
        let state = state_with_entries(1);
        let next = state.update_entry(EntryId::new(), EntryPatch::answer("A"));
        assert_eq!(next, state);
    }

    #[test]
    fn test_add_custom_field_trims_type() {
        let state = state_with_entries(1);
        let id = state.entries()[0].id;

        let next = state.add_custom_field(id, "  Example  ").unwrap();

        let fields = &next.entry(id).unwrap().custom_fields;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, "Example");
        assert_eq!(fields[0].value, "");
        assert!(!fields[0].remembered);
    }

    #[test]
    fn test_add_custom_field_rejects_blank_type() {
        let state = state_with_entries(1);
        let id = state.entries()[0].id;

        assert_eq!(
            state.add_custom_field(id, "   "),
            Err(FormError::EmptyCustomFieldType)
        );
    }

    #[test]
    fn test_add_custom_field_rejects_type_used_by_other_entry() {
        let state = state_with_entries(2);
        let first = state.entries()[0].id;
        let second = state.entries()[1].id;
        let state = state.add_custom_field(first, "Example").unwrap();

        let result = state.reduce(FormAction::AddCustomField {
            entry_id: second,
            type_name: "Example ".to_string(),
        });

        assert_eq!(
            result,
            Err(FormError::DuplicateCustomFieldType("Example".to_string()))
        );
        assert!(state.entry(second).unwrap().custom_fields.is_empty());
        assert_eq!(state.entry(first).unwrap().custom_fields.len(), 1);
    }

    #[test]
    fn test_add_custom_field_unknown_entry_is_noop() {
        let state = state_with_entries(1);
        let id = state.entries()[0].id;
        let state = state.add_custom_field(id, "Example").unwrap();
        let unknown = EntryId::new();

        assert_eq!(state.add_custom_field(unknown, "Notes"), Ok(state.clone()));
        assert_eq!(
            state.add_custom_field(unknown, "  "),
            Err(FormError::EmptyCustomFieldType)
        );
        assert_eq!(
            state.add_custom_field(unknown, "Example"),
            Err(FormError::DuplicateCustomFieldType("Example".to_string()))
        );
    }

    #[test]
    fn test_custom_field_edits_on_unknown_entry_are_noops() {
        let state = state_with_entries(1);
        let id = state.entries()[0].id;
        let state = state.add_custom_field(id, "Example").unwrap();
        let unknown = EntryId::new();

        assert_eq!(
            state.update_custom_field_value(unknown, 0, "ignored".to_string()),
            state
        );
        assert_eq!(state.remove_custom_field(unknown, 0), state);
        assert_eq!(state.toggle_custom_remembered(unknown, 0), state);
    }

    #[test]
    fn test_update_custom_field_value() {
        let state = state_with_entries(1);
        let id = state.entries()[0].id;
        let state = state.add_custom_field(id, "Example").unwrap();

        let next = state.update_custom_field_value(id, 0, "例".to_string());
        assert_eq!(next.entry(id).unwrap().custom_fields[0].value, "例");

        let unchanged = next.update_custom_field_value(id, 3, "ignored".to_string());
        assert_eq!(unchanged, next);
    }

    #[test]
    fn test_remove_custom_field_shifts_later_fields() {
        let state = state_with_entries(1);
        let id = state.entries()[0].id;
        let state = state
            .add_custom_field(id, "One")
            .and_then(|s| s.add_custom_field(id, "Two"))
            .and_then(|s| s.add_custom_field(id, "Three"))
            .unwrap();

        let next = state.remove_custom_field(id, 1);
        let types: Vec<_> = next
            .entry(id)
            .unwrap()
            .custom_fields
            .iter()
            .map(|cf| cf.field_type.as_str())
            .collect();
        assert_eq!(types, ["One", "Three"]);

        assert_eq!(next.remove_custom_field(id, 2), next);
    }

    #[test]
    fn test_removed_custom_type_can_be_reused() {
        let state = state_with_entries(2);
        let first = state.entries()[0].id;
        let second = state.entries()[1].id;
        let state = state.add_custom_field(first, "Example").unwrap();

        let state = state.remove_custom_field(first, 0);
        assert!(state.add_custom_field(second, "Example").is_ok());
    }

    #[test]
    fn test_toggle_remembered_twice_restores_flag() {
        let state = state_with_entries(1);
        let id = state.entries()[0].id;

        let once = state.toggle_remembered(id, TrackableField::Comprehension);
        assert!(once.remembered(id).unwrap().comprehension);

        let twice = once.toggle_remembered(id, TrackableField::Comprehension);
        assert_eq!(twice.remembered(id), state.remembered(id));
    }

    #[test]
    fn test_toggle_remembered_unknown_entry_is_noop() {
        let state = state_with_entries(1);
        let next = state.toggle_remembered(EntryId::new(), TrackableField::Question);
        assert_eq!(next, state);
    }

    #[test]
    fn test_toggle_custom_remembered() {
        let state = state_with_entries(1);
        let id = state.entries()[0].id;
        let state = state.add_custom_field(id, "Example").unwrap();

        let next = state.toggle_custom_remembered(id, 0);
        assert!(next.entry(id).unwrap().custom_fields[0].remembered);
        assert_eq!(next.toggle_custom_remembered(id, 5), next);
    }

    #[test]
    fn test_submit_computes_percentages() {
        let state = state_with_entries(2);
        let first = state.entries()[0].id;
        let second = state.entries()[1].id;
        let state = filled(state, first, "Q1", "A1");
        let state = filled(state, second, "Q2", "A2");
        let state = state
            .toggle_remembered(first, TrackableField::Question)
            .toggle_remembered(second, TrackableField::Question)
            .toggle_remembered(second, TrackableField::Answer);

        let next = state.submit().unwrap();
        let record = next.last_submission().unwrap();

        let percentages = next.percentages().unwrap();
        assert_eq!(percentages.question, 100.0);
        assert_eq!(percentages.answer, 50.0);
        assert_eq!(percentages.reading, 0.0);
        assert_eq!(percentages.comprehension, 0.0);
        assert_eq!(record.entries.len(), 2);
        assert_eq!(&record.percentages, percentages);
    }

    #[test]
    fn test_submit_with_blank_question_keeps_previous_percentages() {
        let state = state_with_entries(1);
        let id = state.entries()[0].id;
        let state = filled(state, id, "Q1", "A1")
            .toggle_remembered(id, TrackableField::Answer)
            .reduce(FormAction::Submit)
            .unwrap();
        let before = state.percentages().cloned();

        let state = state.add_entry();
        let blank = state.entries()[1].id;
        let state = filled(state, blank, "", "A2");

        let result = state.reduce(FormAction::Submit);

        match result {
            Err(FormError::SubmissionRejected(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].entry_id, blank);
                assert_eq!(errors[0].position, 1);
                assert_eq!(errors[0].field, TrackableField::Question);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(state.percentages().cloned(), before);
    }

    #[test]
    fn test_submit_without_entries_is_zero_percent() {
        let next = FormState::new().submit().unwrap();

        let percentages = next.percentages().unwrap();
        for field in TrackableField::ALL {
            assert_eq!(percentages.get(field), 0.0);
        }
        assert!(next.last_submission().unwrap().entries.is_empty());
    }

    #[test]
    fn test_recheck_drops_fixed_and_deleted_entries() {
        let state = state_with_entries(2);
        let first = state.entries()[0].id;
        let second = state.entries()[1].id;
        let error = state.reduce(FormAction::Submit).unwrap_err();
        assert_eq!(error.field_errors().len(), 4);

        let state = filled(state, first, "Q1", "A1");
        let remaining = state.recheck(error).unwrap();
        assert!(remaining.field_errors().iter().all(|e| e.entry_id == second));
        assert_eq!(remaining.field_errors().len(), 2);

        let state = state.delete_entry(second);
        assert_eq!(state.recheck(remaining), None);
    }

    #[test]
    fn test_recheck_keeps_custom_field_errors() {
        let state = state_with_entries(1);
        assert_eq!(
            state.recheck(FormError::EmptyCustomFieldType),
            Some(FormError::EmptyCustomFieldType)
        );
    }

    #[test]
    fn test_reduce_dispatches_every_action() {
        let state = FormState::new().reduce(FormAction::AddEntry).unwrap();
        let id = state.entries()[0].id;

        let actions = vec![
            FormAction::UpdateEntry(id, EntryPatch::question("Q")),
            FormAction::UpdateEntry(id, EntryPatch::answer("A")),
            FormAction::UpdateEntry(id, EntryPatch::comprehension("C")),
            FormAction::AddCustomField {
                entry_id: id,
                type_name: "Example".to_string(),
            },
            FormAction::UpdateCustomFieldValue {
                entry_id: id,
                index: 0,
                value: "value".to_string(),
            },
            FormAction::ToggleCustomRemembered { entry_id: id, index: 0 },
            FormAction::ToggleRemembered {
                entry_id: id,
                field: TrackableField::Reading,
            },
            FormAction::Submit,
        ];
        let state = actions
            .into_iter()
            .try_fold(state, |state, action| state.reduce(action))
            .unwrap();

        let percentages = state.percentages().unwrap();
        assert_eq!(percentages.reading, 100.0);
        assert_eq!(state.last_submission().unwrap().entries, state.entries());
        assert_eq!(percentages.custom("Example"), Some(100.0));

        let state = state
            .reduce(FormAction::RemoveCustomField { entry_id: id, index: 0 })
            .and_then(|s| s.reduce(FormAction::DeleteEntry(id)))
            .unwrap();
        assert!(state.entries().is_empty());
        // Percentages stay until the next accepted submit.
        assert!(state.percentages().is_some());
    }
}
