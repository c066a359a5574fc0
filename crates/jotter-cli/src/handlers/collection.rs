use jotter_core::error::CollectionError;
use jotter_core::{NoteId, NotesEngine};
use log::debug;

// Failures below have already been reported through the alert, so the
// handlers only add notices the alert does not cover.

/// Handle "list"
pub async fn handle_list(engine: &NotesEngine) -> Vec<String> {
    let _ = engine.collection.reload().await;
    Vec::new()
}

/// Handle "page <n>"
pub async fn handle_page(engine: &NotesEngine, input: &str) -> Vec<String> {
    if let Err(e) = engine.collection.goto_page(input).await {
        debug!("page '{}' not loaded: {}", input, e);
    }
    Vec::new()
}

/// Handle "next"
pub async fn handle_next(engine: &NotesEngine) -> Vec<String> {
    if !engine.collection.snapshot().await.can_go_next() {
        return vec!["Next page is not available.".to_string()];
    }
    let _ = engine.collection.next_page().await;
    Vec::new()
}

/// Handle "prev"
pub async fn handle_prev(engine: &NotesEngine) -> Vec<String> {
    if !engine.collection.snapshot().await.can_go_prev() {
        return vec!["Previous page is not available.".to_string()];
    }
    let _ = engine.collection.prev_page().await;
    Vec::new()
}

/// Handle "search <query>"
pub async fn handle_search(engine: &NotesEngine, query: &str) -> Vec<String> {
    let _ = engine.collection.run_search(query).await;
    Vec::new()
}

/// Handle "clear"
pub async fn handle_clear(engine: &NotesEngine) -> Vec<String> {
    if !engine.collection.view().await.is_search() {
        return vec!["Not in search mode.".to_string()];
    }
    let _ = engine.collection.clear_search().await;
    Vec::new()
}

/// Handle "delete <id>"
pub async fn handle_delete(engine: &NotesEngine, id: NoteId) -> Vec<String> {
    match engine.collection.delete_note(id).await {
        Err(CollectionError::Remote(e)) if e.is_not_found() => {
            vec![format!("Note #{} does not exist.", id)]
        }
        _ => Vec::new(),
    }
}
