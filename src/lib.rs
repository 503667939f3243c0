pub mod config;
pub mod error;
pub mod export;
pub mod models;

pub use config::AppConfig;
pub use error::{ExportError, FieldError, FormError};
pub use models::{CustomField, Entry, EntryId, FormAction, FormState, Percentages, TrackableField};
