use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned note identifier
pub type NoteId = u64;

/// Page size the notes service paginates with
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A note as stored by the remote service.
///
/// `id`, `created_at` and `updated_at` are owned by the server; the client
/// only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a create request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Body of an update request. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<NoteDraft> for NotePatch {
    fn from(draft: NoteDraft) -> Self {
        Self {
            title: Some(draft.title),
            content: Some(draft.content),
        }
    }
}

/// One page of the remote collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePage {
    pub items: Vec<Note>,
    pub total_count: u64,
}

impl NotePage {
    pub fn total_pages(&self, page_size: u32) -> u32 {
        total_pages(self.total_count, page_size)
    }
}

/// `ceil(count / page_size)`, never less than 1
pub fn total_pages(count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = count.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(100, 10), 10);
        assert_eq!(total_pages(101, 10), 11);
    }

    #[test]
    fn test_note_from_wire() {
        let json = r#"{
            "id": 7,
            "title": "Groceries",
            "content": "milk",
            "created_at": "2024-10-01T12:34:56.789012Z",
            "updated_at": "2024-10-02T08:00:00Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id, 7);
        assert_eq!(note.title, "Groceries");
        assert!(note.created_at <= note.updated_at);
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = NotePatch {
            title: Some("New".to_string()),
            content: None,
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"title":"New"}"#);
    }
}
