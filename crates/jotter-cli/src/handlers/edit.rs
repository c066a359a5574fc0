use jotter_core::error::SaveError;
use jotter_core::{NoteId, NotesEngine, SaveOutcome};

const NO_SESSION: &str = "No note is open. Use 'new' or 'edit <id>' first.";

/// Handle "new"
pub fn handle_new(engine: &mut NotesEngine) -> Vec<String> {
    engine.editor.open(None);
    Vec::new()
}

/// Handle "edit <id>"
pub async fn handle_edit(engine: &mut NotesEngine, id: NoteId) -> Vec<String> {
    match engine.editor.open_by_id(id).await {
        Ok(()) => Vec::new(),
        Err(e) if e.is_not_found() => vec![format!("Note #{} does not exist.", id)],
        Err(_) => Vec::new(),
    }
}

/// Handle "title <text>"
pub fn handle_title(engine: &mut NotesEngine, title: &str) -> Vec<String> {
    if engine.editor.set_title(title) {
        Vec::new()
    } else {
        vec![NO_SESSION.to_string()]
    }
}

/// Handle "content <text>"
pub fn handle_content(engine: &mut NotesEngine, content: &str) -> Vec<String> {
    if engine.editor.set_content(content) {
        Vec::new()
    } else {
        vec![NO_SESSION.to_string()]
    }
}

/// Handle "save"
pub async fn handle_save(engine: &mut NotesEngine) -> Vec<String> {
    match engine.editor.save().await {
        Ok(SaveOutcome::Created(note)) => vec![format!("Created note #{}.", note.id)],
        Ok(SaveOutcome::Updated(note)) => vec![format!("Updated note #{}.", note.id)],
        Err(SaveError::NoSession) => vec![NO_SESSION.to_string()],
        // Field errors are rendered with the session; remote errors raised an alert
        Err(_) => Vec::new(),
    }
}

/// Handle "cancel"
pub fn handle_cancel(engine: &mut NotesEngine) -> Vec<String> {
    if !engine.editor.is_open() {
        return vec![NO_SESSION.to_string()];
    }
    engine.editor.cancel();
    vec!["Changes discarded.".to_string()]
}
