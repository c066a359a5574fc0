//! Text rendering of core state for the terminal

use jotter_core::{Activity, Alert, CollectionSnapshot, EditSession, Note, ViewState};

const PREVIEW_CHARS: usize = 60;

pub fn render_collection(snapshot: &CollectionSnapshot) -> String {
    let mut out = String::new();

    match &snapshot.view {
        ViewState::Page(page) => {
            out.push_str(&format!("Notes (page {} of {})\n", page.page, page.total_pages));
            if page.notes.is_empty() {
                out.push_str("  No notes yet.\n");
            }
            for note in &page.notes {
                out.push_str(&render_note_line(note));
            }
        }
        ViewState::Search(search) => {
            out.push_str(&format!(
                "Search results for \"{}\" ({})\n",
                search.query,
                search.results.len()
            ));
            if search.results.is_empty() {
                out.push_str("  No notes match.\n");
            }
            for note in &search.results {
                out.push_str(&render_note_line(note));
            }
        }
    }

    out.push_str(&render_pager(snapshot));
    if let Some(status) = render_activity(snapshot.activity) {
        out.push('\n');
        out.push_str(&status);
    }
    out
}

fn render_note_line(note: &Note) -> String {
    format!(
        "  [{}] {}  ({})\n      {}\n",
        note.id,
        note.title,
        note.updated_at.format("%Y-%m-%d %H:%M"),
        preview(&note.content)
    )
}

/// Single line of content, cut at `PREVIEW_CHARS` characters
fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS || content.lines().nth(1).is_some() {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}

/// Pager line; disabled controls render as dashes
pub fn render_pager(snapshot: &CollectionSnapshot) -> String {
    if snapshot.view.is_search() {
        return format!("  'clear' returns to page {}", snapshot.page);
    }
    let prev = if snapshot.can_go_prev() { "< prev" } else { "  ----" };
    let next = if snapshot.can_go_next() { "next >" } else { "----  " };
    format!(
        "  {} | {} / {} | {}",
        prev, snapshot.page, snapshot.total_pages, next
    )
}

pub fn render_activity(activity: Activity) -> Option<String> {
    match activity {
        Activity::Idle => None,
        Activity::Loading => Some("Loading...".to_string()),
        Activity::Searching => Some("Searching...".to_string()),
        Activity::Generating { progress } => {
            Some(format!("Generating dummy notes... {}%", progress))
        }
    }
}

pub fn render_alert(alert: &Alert) -> String {
    format!("[{}] {}", alert.kind, alert.message)
}

pub fn render_session(session: &EditSession) -> String {
    let mut out = match &session.target {
        Some(note) => format!("Editing note #{}\n", note.id),
        None => "New note\n".to_string(),
    };
    out.push_str(&format!("  title:   {}\n", session.title));
    out.push_str(&format!("  content: {}\n", session.content));
    for (field, message) in &session.errors {
        out.push_str(&format!("  ! {}: {}\n", field, message));
    }
    out.push_str("  'save' to submit, 'cancel' to discard");
    out
}

pub fn render_progress(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) / 5;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        " ".repeat(20 - filled),
        progress
    )
}
