//! Jotter Core Library
//!
//! Client-side state for a remote notes service: the typed service client,
//! and the controllers that keep a paginated/searchable view of it in sync.
//! No terminal IO.

pub mod alert;
pub mod api;
pub mod bulk;
pub mod collection;
mod config;
pub mod edit;
mod engine;
pub mod error;
pub mod model;

pub use alert::{Alert, AlertController, AlertKind};
pub use api::{HttpNotesApi, NotesApi};
pub use collection::{Activity, CollectionController, CollectionSnapshot, LoadStatus, ViewState};
pub use config::{AlertConfig, ApiConfig, BulkConfig, JotterConfig, LoggingConfig, BASE_URL_ENV};
pub use edit::{EditSession, EditSessionController, Field, SaveOutcome, ValidationErrors};
pub use engine::NotesEngine;
pub use model::{Note, NoteDraft, NoteId, NotePatch};
