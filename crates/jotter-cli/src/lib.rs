//! Jotter Terminal Client
//!
//! Line-oriented front end: parses commands, hands them to the core
//! controllers and prints the resulting screen.

use jotter_core::{BulkConfig, JotterConfig, NotesEngine};
use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::command::HELP;
use crate::render::{render_alert, render_collection, render_session};

mod command;
mod handlers;
mod render;
mod tests;

pub use command::{Command, ParseError};

const PROMPT: &[u8] = b"> ";

/// What the session loop does after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// One interactive session over a notes engine
pub struct App {
    engine: NotesEngine,
    bulk_defaults: BulkConfig,
}

impl App {
    pub fn new(engine: NotesEngine, config: &JotterConfig) -> Self {
        Self {
            engine,
            bulk_defaults: config.bulk.clone(),
        }
    }

    pub fn engine(&self) -> &NotesEngine {
        &self.engine
    }

    /// Load the first page and render the opening screen
    pub async fn start(&self) -> String {
        // A failed first load is shown through the alert
        let _ = self.engine.collection.load_page(1).await;
        self.screen(Vec::new()).await
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(ParseError::Empty) => return Flow::Continue(String::new()),
            Err(e) => return Flow::Continue(e.to_string()),
        };
        debug!("command: {:?}", command);

        let engine = &mut self.engine;
        let notices = match command {
            Command::List => handlers::handle_list(engine).await,
            Command::Page(input) => handlers::handle_page(engine, &input).await,
            Command::Next => handlers::handle_next(engine).await,
            Command::Prev => handlers::handle_prev(engine).await,
            Command::Search(query) => handlers::handle_search(engine, &query).await,
            Command::Clear => handlers::handle_clear(engine).await,
            Command::New => handlers::handle_new(engine),
            Command::Edit(id) => handlers::handle_edit(engine, id).await,
            Command::Title(title) => handlers::handle_title(engine, &title),
            Command::Content(content) => handlers::handle_content(engine, &content),
            Command::Save => handlers::handle_save(engine).await,
            Command::Cancel => handlers::handle_cancel(engine),
            Command::Delete(id) => handlers::handle_delete(engine, id).await,
            Command::Generate { total, batch } => {
                let total = total.unwrap_or(self.bulk_defaults.total_records);
                let batch = batch.unwrap_or(self.bulk_defaults.batch_size);
                handlers::handle_generate(engine, total, batch).await
            }
            Command::Dismiss => handlers::handle_dismiss(engine),
            Command::Help => return Flow::Continue(HELP.to_string()),
            Command::Quit => return Flow::Quit,
        };

        Flow::Continue(self.screen(notices).await)
    }

    /// Notices, then the collection, the open edit session and the alert
    async fn screen(&self, notices: Vec<String>) -> String {
        let mut parts = notices;
        parts.push(render_collection(&self.engine.collection.snapshot().await));
        if let Some(session) = self.engine.editor.session() {
            parts.push(render_session(session));
        }
        if let Some(alert) = self.engine.alerts.current() {
            parts.push(render_alert(&alert));
        }
        parts.join("\n")
    }
}

/// Drive `app` from `reader` until "quit" or end of input, writing every
/// screen to `writer`.
pub async fn run_session<R, W>(app: &mut App, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let opening = app.start().await;
    writer.write_all(opening.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.write_all(PROMPT).await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        match app.handle_line(&line).await {
            Flow::Continue(output) => {
                if !output.is_empty() {
                    writer.write_all(output.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                }
                writer.write_all(PROMPT).await?;
                writer.flush().await?;
            }
            Flow::Quit => break,
        }
    }

    writer.write_all(b"bye\n").await?;
    writer.flush().await?;
    info!("session ended");
    Ok(())
}
