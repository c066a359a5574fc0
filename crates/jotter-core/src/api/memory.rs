//! In-memory stand-in for the remote notes service.
//!
//! Follows the server's conventions (newest first, 10 per page, 404 past the
//! last page) and records every call so tests can assert on traffic.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::NotesApi;
use crate::error::ApiError;
use crate::model::{total_pages, Note, NoteDraft, NoteId, NotePage, NotePatch, DEFAULT_PAGE_SIZE};

/// Which remote operation a recorded call was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOp {
    ListPage,
    ListAll,
    Get,
    Search,
    Create,
    Update,
    Delete,
    GenerateBatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListPage(u32),
    ListAll,
    Get(NoteId),
    Search(String),
    Create(NoteDraft),
    Update(NoteId, NotePatch),
    Delete(NoteId),
    GenerateBatch(u32),
}

impl ApiCall {
    pub fn op(&self) -> ApiOp {
        match self {
            ApiCall::ListPage(_) => ApiOp::ListPage,
            ApiCall::ListAll => ApiOp::ListAll,
            ApiCall::Get(_) => ApiOp::Get,
            ApiCall::Search(_) => ApiOp::Search,
            ApiCall::Create(_) => ApiOp::Create,
            ApiCall::Update(..) => ApiOp::Update,
            ApiCall::Delete(_) => ApiOp::Delete,
            ApiCall::GenerateBatch(_) => ApiOp::GenerateBatch,
        }
    }
}

#[derive(Default)]
struct MemoryState {
    /// Oldest first; pages are served newest first
    notes: Vec<Note>,
    next_id: NoteId,
    calls: Vec<ApiCall>,
    /// (op, 1-based call number of that op) pairs that fail
    failures: HashSet<(ApiOp, usize)>,
    page_latency: HashMap<u32, Duration>,
}

pub struct InMemoryNotesApi {
    state: Mutex<MemoryState>,
    page_size: u32,
}

impl InMemoryNotesApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 1,
                ..Default::default()
            }),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Service pre-populated with `count` notes titled "Note 1".."Note N"
    pub fn with_notes(count: usize) -> Self {
        let api = Self::new();
        {
            let mut state = api.lock();
            for i in 1..=count {
                insert(&mut state, NoteDraft::new(format!("Note {}", i), "seeded"));
            }
        }
        api
    }

    /// Make the `nth` call (1-based, counted per operation) of `op` fail
    /// with a 500.
    pub fn fail_call(&self, op: ApiOp, nth: usize) {
        self.lock().failures.insert((op, nth));
    }

    /// Delay responses to `list_page(page)`, failed ones included
    pub fn set_page_latency(&self, page: u32, latency: Duration) {
        self.lock().page_latency.insert(page, latency);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn calls_of(&self, op: ApiOp) -> Vec<ApiCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.op() == op)
            .cloned()
            .collect()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.lock().notes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and report whether it was scheduled to fail
    fn record(&self, call: ApiCall) -> Result<(), ApiError> {
        let mut state = self.lock();
        let op = call.op();
        state.calls.push(call);
        let nth = state.calls.iter().filter(|c| c.op() == op).count();
        if state.failures.remove(&(op, nth)) {
            return Err(ApiError::Server {
                status: 500,
                message: format!("injected failure on {:?} call {}", op, nth),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryNotesApi {
    fn default() -> Self {
        Self::new()
    }
}

fn insert(state: &mut MemoryState, draft: NoteDraft) -> Note {
    let now = Utc::now();
    let note = Note {
        id: state.next_id,
        title: draft.title,
        content: draft.content,
        created_at: now,
        updated_at: now,
    };
    state.next_id += 1;
    state.notes.push(note.clone());
    note
}

fn not_found() -> ApiError {
    ApiError::Server {
        status: 404,
        message: r#"{"detail":"Not found."}"#.to_string(),
    }
}

fn bad_request(field: &str) -> ApiError {
    ApiError::Server {
        status: 400,
        message: format!(r#"{{"{}":["This field cannot be empty."]}}"#, field),
    }
}

#[async_trait]
impl NotesApi for InMemoryNotesApi {
    async fn list_page(&self, page: u32) -> Result<NotePage, ApiError> {
        let injected = self.record(ApiCall::ListPage(page));

        let latency = self.lock().page_latency.get(&page).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        injected?;

        let state = self.lock();
        let count = state.notes.len() as u64;
        if page == 0 || page > total_pages(count, self.page_size) {
            return Err(not_found());
        }
        let start = ((page - 1) * self.page_size) as usize;
        let items = state
            .notes
            .iter()
            .rev()
            .skip(start)
            .take(self.page_size as usize)
            .cloned()
            .collect();
        Ok(NotePage {
            items,
            total_count: count,
        })
    }

    async fn list_all(&self) -> Result<Vec<Note>, ApiError> {
        self.record(ApiCall::ListAll)?;
        Ok(self.lock().notes.iter().rev().cloned().collect())
    }

    async fn get(&self, id: NoteId) -> Result<Note, ApiError> {
        self.record(ApiCall::Get(id))?;
        self.lock()
            .notes
            .iter()
            .find(|note| note.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn search(&self, query: &str) -> Result<Vec<Note>, ApiError> {
        self.record(ApiCall::Search(query.to_string()))?;
        let needle = query.to_lowercase();
        Ok(self
            .lock()
            .notes
            .iter()
            .rev()
            .filter(|note| {
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        self.record(ApiCall::Create(draft.clone()))?;
        if draft.title.trim().is_empty() {
            return Err(bad_request("title"));
        }
        if draft.content.trim().is_empty() {
            return Err(bad_request("content"));
        }
        Ok(insert(&mut self.lock(), draft.clone()))
    }

    async fn update(&self, id: NoteId, patch: &NotePatch) -> Result<Note, ApiError> {
        self.record(ApiCall::Update(id, patch.clone()))?;
        let mut state = self.lock();
        let note = state
            .notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(not_found)?;
        if let Some(title) = &patch.title {
            note.title = title.clone();
        }
        if let Some(content) = &patch.content {
            note.content = content.clone();
        }
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete(&self, id: NoteId) -> Result<(), ApiError> {
        self.record(ApiCall::Delete(id))?;
        let mut state = self.lock();
        let before = state.notes.len();
        state.notes.retain(|note| note.id != id);
        if state.notes.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn generate_batch(&self, count: u32) -> Result<(), ApiError> {
        self.record(ApiCall::GenerateBatch(count))?;
        let mut state = self.lock();
        for _ in 0..count {
            let n = state.next_id;
            insert(
                &mut state,
                NoteDraft::new(format!("Dummy note {}", n), "Generated placeholder content."),
            );
        }
        Ok(())
    }
}
