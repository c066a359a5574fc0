use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, error};

use crate::alert::AlertController;
use crate::api::NotesApi;
use crate::collection::CollectionController;
use crate::error::{ApiError, SaveError};
use crate::model::{Note, NoteDraft, NoteId, NotePatch};

/// Longest title the server accepts, in characters
pub const MAX_TITLE_CHARS: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Content,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => f.write_str("title"),
            Field::Content => f.write_str("content"),
        }
    }
}

/// Field -> message; empty when the draft is valid
pub type ValidationErrors = BTreeMap<Field, String>;

/// Client-side checks run before anything is sent.
pub fn validate(draft: &NoteDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if draft.title.trim().is_empty() {
        errors.insert(Field::Title, "Title is required".to_string());
    } else if draft.title.chars().count() > MAX_TITLE_CHARS {
        errors.insert(
            Field::Title,
            format!("Title cannot exceed {} characters.", MAX_TITLE_CHARS),
        );
    }

    if draft.content.trim().is_empty() {
        errors.insert(Field::Content, "Content is required".to_string());
    }

    errors
}

/// In-progress create or edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// `None` while creating a new note
    pub target: Option<Note>,
    pub title: String,
    pub content: String,
    pub errors: ValidationErrors,
}

impl EditSession {
    pub fn is_new(&self) -> bool {
        self.target.is_none()
    }

    pub fn draft(&self) -> NoteDraft {
        NoteDraft::new(self.title.clone(), self.content.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(Note),
    Updated(Note),
}

/// Owns the single edit session and submits it.
pub struct EditSessionController {
    api: Arc<dyn NotesApi>,
    collection: CollectionController,
    alerts: AlertController,
    session: Option<EditSession>,
}

impl EditSessionController {
    pub fn new(
        api: Arc<dyn NotesApi>,
        collection: CollectionController,
        alerts: AlertController,
    ) -> Self {
        Self {
            api,
            collection,
            alerts,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Start editing `note`, or a new note when `None`. Replaces any open
    /// session.
    pub fn open(&mut self, note: Option<Note>) {
        let (title, content) = note
            .as_ref()
            .map(|n| (n.title.clone(), n.content.clone()))
            .unwrap_or_default();
        self.session = Some(EditSession {
            target: note,
            title,
            content,
            errors: ValidationErrors::new(),
        });
    }

    /// Open the note with `id`, taking it from the current view when it is
    /// shown there and fetching it otherwise.
    pub async fn open_by_id(&mut self, id: NoteId) -> Result<(), ApiError> {
        if let Some(note) = self.collection.view().await.find(id).cloned() {
            self.open(Some(note));
            return Ok(());
        }

        match self.api.get(id).await {
            Ok(note) => {
                self.open(Some(note));
                Ok(())
            }
            Err(e) => {
                error!("failed to fetch note {}: {}", id, e);
                self.alerts.error("Failed to load note.");
                Err(e)
            }
        }
    }

    /// Returns false when no session is open.
    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        match &mut self.session {
            Some(session) => {
                session.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Returns false when no session is open.
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        match &mut self.session {
            Some(session) => {
                session.content = content.into();
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Validate and submit the session.
    ///
    /// Invalid drafts never reach the network. On success the collection is
    /// resynchronized and the session closes; on a remote failure the session
    /// stays open with its staged values so the user can retry.
    pub async fn save(&mut self) -> Result<SaveOutcome, SaveError> {
        let session = self.session.as_mut().ok_or(SaveError::NoSession)?;
        let draft = session.draft();

        let errors = validate(&draft);
        if !errors.is_empty() {
            debug!("draft rejected: {:?}", errors);
            session.errors = errors.clone();
            return Err(SaveError::Invalid(errors));
        }
        session.errors.clear();
        let target = session.target.as_ref().map(|note| note.id);

        let result = match target {
            Some(id) => self
                .api
                .update(id, &NotePatch::from(draft))
                .await
                .map(SaveOutcome::Updated),
            None => self.api.create(&draft).await.map(SaveOutcome::Created),
        };

        match result {
            Ok(outcome) => {
                match &outcome {
                    SaveOutcome::Created(note) => {
                        debug!("created note {}", note.id);
                        self.alerts.success("Note added successfully.");
                    }
                    SaveOutcome::Updated(note) => {
                        debug!("updated note {}", note.id);
                        self.alerts.success("Note updated successfully.");
                    }
                }
                // A failed reload has already raised its own alert
                let _ = self.collection.after_mutation().await;
                self.session = None;
                Ok(outcome)
            }
            Err(e) => {
                error!("failed to save note: {}", e);
                self.alerts.error("Failed to save note.");
                Err(e.into())
            }
        }
    }
}
