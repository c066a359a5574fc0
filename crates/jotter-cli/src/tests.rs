#[cfg(test)]
mod tests {
    use crate::{run_session, App, Flow};
    use jotter_core::api::memory::{ApiCall, ApiOp, InMemoryNotesApi};
    use jotter_core::{JotterConfig, NotesEngine};
    use std::sync::Arc;

    async fn setup_app(api: Arc<InMemoryNotesApi>) -> App {
        let config = JotterConfig::default();
        let app = App::new(NotesEngine::new(api, &config), &config);
        app.start().await;
        app
    }

    async fn run(app: &mut App, line: &str) -> String {
        match app.handle_line(line).await {
            Flow::Continue(output) => output,
            Flow::Quit => panic!("unexpected quit on '{}'", line),
        }
    }

    #[tokio::test]
    async fn test_scripted_session_creates_note() {
        let api = Arc::new(InMemoryNotesApi::new());
        let config = JotterConfig::default();
        let mut app = App::new(NotesEngine::new(api.clone(), &config), &config);

        let input = b"new\ntitle Groceries\ncontent milk and eggs\nsave\nquit\nlist\n";
        let mut output = Vec::new();
        run_session(&mut app, &input[..], &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("No notes yet."));
        assert!(output.contains("Created note #1."));
        assert!(output.contains("[1] Groceries"));
        assert!(output.contains("[success] Note added successfully."));
        assert!(output.ends_with("bye\n"));

        // Nothing after "quit" runs
        assert_eq!(api.calls_of(ApiOp::ListPage).len(), 2);
        assert!(app.engine().editor.session().is_none());
    }

    #[tokio::test]
    async fn test_session_ends_at_end_of_input() {
        let api = Arc::new(InMemoryNotesApi::with_notes(3));
        let config = JotterConfig::default();
        let mut app = App::new(NotesEngine::new(api, &config), &config);

        let mut output = Vec::new();
        run_session(&mut app, &b"help\n"[..], &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Notes (page 1 of 1)"));
        assert!(output.contains("Commands:"));
        assert!(output.ends_with("bye\n"));
    }

    #[tokio::test]
    async fn test_pager_stops_at_last_page() {
        let api = Arc::new(InMemoryNotesApi::with_notes(25));
        let mut app = setup_app(api.clone()).await;

        let out = run(&mut app, "prev").await;
        assert!(out.starts_with("Previous page is not available."));

        assert!(run(&mut app, "next").await.contains("Notes (page 2 of 3)"));
        let out = run(&mut app, "next").await;
        assert!(out.contains("Notes (page 3 of 3)"));
        assert!(out.contains("< prev | 3 / 3 | ----  "));

        let out = run(&mut app, "next").await;
        assert!(out.starts_with("Next page is not available."));
        assert_eq!(
            api.calls_of(ApiOp::ListPage),
            vec![ApiCall::ListPage(1), ApiCall::ListPage(2), ApiCall::ListPage(3)]
        );
    }

    #[tokio::test]
    async fn test_invalid_page_input_warns_without_request() {
        let api = Arc::new(InMemoryNotesApi::with_notes(25));
        let mut app = setup_app(api.clone()).await;

        let out = run(&mut app, "page 9").await;
        assert!(out.contains("[warning] Please enter a valid page number between 1 and 3."));
        let out = run(&mut app, "page two").await;
        assert!(out.contains("[warning] Please enter a valid page number between 1 and 3."));
        assert_eq!(api.calls_of(ApiOp::ListPage).len(), 1);

        assert!(run(&mut app, "page 3").await.contains("Notes (page 3 of 3)"));
    }

    #[tokio::test]
    async fn test_search_then_clear() {
        let api = Arc::new(InMemoryNotesApi::with_notes(12));
        let mut app = setup_app(api.clone()).await;

        let out = run(&mut app, "search note 1").await;
        assert!(out.contains("Search results for \"note 1\" (4)"));
        assert!(out.contains("'clear' returns to page 1"));
        assert!(run(&mut app, "next").await.starts_with("Next page is not available."));

        let out = run(&mut app, "clear").await;
        assert!(out.contains("Notes (page 1 of 2)"));
        assert!(run(&mut app, "clear").await.starts_with("Not in search mode."));
        assert_eq!(
            api.calls_of(ApiOp::Search),
            vec![ApiCall::Search("note 1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_save_shows_field_errors() {
        let api = Arc::new(InMemoryNotesApi::new());
        let mut app = setup_app(api.clone()).await;

        run(&mut app, "new").await;
        let out = run(&mut app, "save").await;
        assert!(out.contains("New note"));
        assert!(out.contains("! title: Title is required"));
        assert!(out.contains("! content: Content is required"));
        assert!(api.calls_of(ApiOp::Create).is_empty());

        let out = run(&mut app, "cancel").await;
        assert!(out.starts_with("Changes discarded."));
        assert!(!out.contains("New note"));
        assert!(run(&mut app, "title x").await.starts_with("No note is open."));
    }

    #[tokio::test]
    async fn test_edit_existing_note() {
        let api = Arc::new(InMemoryNotesApi::with_notes(3));
        let mut app = setup_app(api.clone()).await;

        assert!(run(&mut app, "edit 2").await.contains("Editing note #2"));
        run(&mut app, "title Renamed").await;
        let out = run(&mut app, "save").await;

        assert!(out.starts_with("Updated note #2."));
        assert!(out.contains("[2] Renamed"));
        assert!(out.contains("[success] Note updated successfully."));
        assert!(api.calls_of(ApiOp::Get).is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_note_then_dismiss() {
        let api = Arc::new(InMemoryNotesApi::with_notes(3));
        let mut app = setup_app(api).await;

        let out = run(&mut app, "delete 99").await;
        assert!(out.starts_with("Note #99 does not exist."));
        assert!(out.contains("[error] Failed to delete note."));

        let out = run(&mut app, "dismiss").await;
        assert!(!out.contains("[error]"));
        assert!(run(&mut app, "dismiss").await.starts_with("Nothing to dismiss."));
    }

    #[tokio::test]
    async fn test_generate_prints_progress() {
        let api = Arc::new(InMemoryNotesApi::new());
        let mut app = setup_app(api.clone()).await;

        let out = run(&mut app, "generate 30 10").await;
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with(" 33%"));
        assert!(lines[1].ends_with(" 66%"));
        assert!(lines[2].ends_with("100%"));
        assert_eq!(lines[3], "30 notes created in 3 batches.");
        assert!(out.contains("Notes (page 1 of 3)"));
        assert!(out.contains("[success] Successfully generated 30 dummy notes."));
        assert_eq!(api.notes().len(), 30);
    }

    #[tokio::test]
    async fn test_generate_rejects_uneven_batches() {
        let api = Arc::new(InMemoryNotesApi::new());
        let mut app = setup_app(api.clone()).await;

        let out = run(&mut app, "generate 25 10").await;
        assert!(out.starts_with("Batch size 10 must evenly divide the total of 25."));
        assert!(api.calls_of(ApiOp::GenerateBatch).is_empty());
    }

    #[tokio::test]
    async fn test_generate_failure_reports_completed_batches() {
        let api = Arc::new(InMemoryNotesApi::new());
        api.fail_call(ApiOp::GenerateBatch, 3);
        let mut app = setup_app(api).await;

        let out = run(&mut app, "generate").await;
        assert!(out.contains("Stopped after 2 completed batches."));
        assert!(out.contains("Notes (page 1 of 2)"));
        assert!(out.contains("[error] Failed to generate dummy notes."));
    }

    #[tokio::test]
    async fn test_parse_errors_are_reported() {
        let api = Arc::new(InMemoryNotesApi::new());
        let mut app = setup_app(api).await;

        assert!(run(&mut app, "fly").await.contains("unknown command 'fly'"));
        assert_eq!(run(&mut app, "   ").await, "");
        assert_eq!(app.handle_line("quit").await, Flow::Quit);
    }
}
