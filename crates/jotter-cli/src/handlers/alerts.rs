use jotter_core::NotesEngine;

/// Handle "dismiss"
pub fn handle_dismiss(engine: &NotesEngine) -> Vec<String> {
    if engine.alerts.current().is_none() {
        return vec!["Nothing to dismiss.".to_string()];
    }
    engine.alerts.dismiss();
    Vec::new()
}
