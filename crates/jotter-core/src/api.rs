use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{Note, NoteDraft, NoteId, NotePage, NotePatch};

mod http;
#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use http::HttpNotesApi;

/// Abstract interface for the remote notes service.
///
/// Every call is a single round-trip; nothing is retried.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Fetch one page (1-based) together with the total note count.
    async fn list_page(&self, page: u32) -> Result<NotePage, ApiError>;

    /// Fetch the whole collection without pagination.
    async fn list_all(&self) -> Result<Vec<Note>, ApiError>;

    async fn get(&self, id: NoteId) -> Result<Note, ApiError>;

    /// Full-text search. Callers never pass an empty query.
    async fn search(&self, query: &str) -> Result<Vec<Note>, ApiError>;

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ApiError>;

    async fn update(&self, id: NoteId, patch: &NotePatch) -> Result<Note, ApiError>;

    async fn delete(&self, id: NoteId) -> Result<(), ApiError>;

    /// Ask the server to create `count` placeholder notes.
    async fn generate_batch(&self, count: u32) -> Result<(), ApiError>;
}
