use std::sync::Arc;
use std::time::Duration;

use crate::alert::AlertController;
use crate::api::{HttpNotesApi, NotesApi};
use crate::bulk::BulkGenerationController;
use crate::collection::CollectionController;
use crate::config::JotterConfig;
use crate::edit::EditSessionController;
use crate::error::ApiError;

/// The NotesEngine wires the controllers around one notes service.
///
/// Commands go through the controllers it exposes; they share a single
/// alert and a single collection view.
pub struct NotesEngine {
    pub api: Arc<dyn NotesApi>,
    pub alerts: AlertController,
    pub collection: CollectionController,
    pub editor: EditSessionController,
    pub bulk: BulkGenerationController,
}

impl NotesEngine {
    pub fn new(api: Arc<dyn NotesApi>, config: &JotterConfig) -> Self {
        let alerts = AlertController::new(Duration::from_millis(config.alerts.duration_ms));
        let collection =
            CollectionController::new(api.clone(), alerts.clone(), config.api.page_size);
        let editor = EditSessionController::new(api.clone(), collection.clone(), alerts.clone());
        let bulk = BulkGenerationController::new(api.clone(), collection.clone(), alerts.clone());

        Self {
            api,
            alerts,
            collection,
            editor,
            bulk,
        }
    }

    /// Engine talking HTTP to `config.api.base_url`
    pub fn connect(config: &JotterConfig) -> Result<Self, ApiError> {
        let api = HttpNotesApi::new(&config.api.base_url)?;
        Ok(Self::new(Arc::new(api), config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::InMemoryNotesApi;
    use crate::collection::ViewState;

    #[tokio::test]
    async fn test_controllers_share_view_and_alert() {
        let mut engine = NotesEngine::new(
            Arc::new(InMemoryNotesApi::with_notes(2)),
            &JotterConfig::default(),
        );
        engine.collection.load_page(1).await.unwrap();

        engine.editor.open_by_id(1).await.unwrap();
        engine.editor.set_content("edited");
        engine.editor.save().await.unwrap();

        assert_eq!(
            engine.alerts.current().unwrap().message,
            "Note updated successfully."
        );
        match engine.collection.view().await {
            ViewState::Page(view) => {
                assert_eq!(view.notes.iter().find(|n| n.id == 1).unwrap().content, "edited")
            }
            other => panic!("expected page view, got {:?}", other),
        }
    }

    #[test]
    fn test_connect_rejects_bad_url() {
        let mut config = JotterConfig::default();
        config.api.base_url = "::not a url::".to_string();
        assert!(matches!(
            NotesEngine::connect(&config),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
