pub mod entry;
pub mod form_state;
pub mod remembered;
pub mod submission;

pub use entry::{CustomField, Entry, EntryId, EntryPatch};
pub use form_state::{FormAction, FormState};
pub use remembered::{RememberedFlags, TrackableField};
pub use submission::{Percentages, SubmissionRecord};
