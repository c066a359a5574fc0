use std::sync::Arc;

use log::{error, info};

use crate::alert::AlertController;
use crate::api::NotesApi;
use crate::collection::CollectionController;
use crate::error::BulkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    pub batches: u32,
    pub records: u32,
}

/// Fills the remote collection with placeholder notes, one batch at a time.
pub struct BulkGenerationController {
    api: Arc<dyn NotesApi>,
    collection: CollectionController,
    alerts: AlertController,
}

impl BulkGenerationController {
    pub fn new(
        api: Arc<dyn NotesApi>,
        collection: CollectionController,
        alerts: AlertController,
    ) -> Self {
        Self {
            api,
            collection,
            alerts,
        }
    }

    pub async fn run(
        &self,
        total_records: u32,
        batch_size: u32,
    ) -> Result<GenerationReport, BulkError> {
        self.run_with_progress(total_records, batch_size, |_| {})
            .await
    }

    /// Generate `total_records` notes in `total_records / batch_size`
    /// batches. `batch_size` is expected to divide `total_records`; a
    /// remainder is not generated and a run without a full batch is refused.
    ///
    /// Each batch is awaited before the next is sent and `on_progress`
    /// receives the completed percentage after every batch. The first failed
    /// batch stops the run. The current page is reloaded afterwards whether
    /// or not the run succeeded.
    pub async fn run_with_progress<F>(
        &self,
        total_records: u32,
        batch_size: u32,
        mut on_progress: F,
    ) -> Result<GenerationReport, BulkError>
    where
        F: FnMut(u8) + Send,
    {
        let batches = total_records.checked_div(batch_size).unwrap_or(0);
        if batches == 0 {
            self.alerts
                .warning("Nothing to generate: no full batch fits in the requested total.");
            return Err(BulkError::NoBatches {
                total_records,
                batch_size,
            });
        }
        if !self.collection.begin_generation().await {
            self.alerts.warning("Dummy data generation is already running.");
            return Err(BulkError::AlreadyRunning);
        }

        let records = batches * batch_size;
        info!(
            "generating {} notes in {} batches of {}",
            records, batches, batch_size
        );

        let mut outcome = Ok(GenerationReport {
            batches,
            records,
        });
        for batch in 1..=batches {
            if let Err(e) = self.api.generate_batch(batch_size).await {
                outcome = Err(BulkError::BatchFailed {
                    batch,
                    completed: batch - 1,
                    source: e,
                });
                break;
            }
            let progress = (u64::from(batch) * 100 / u64::from(batches)) as u8;
            self.collection.set_generation_progress(progress).await;
            on_progress(progress);
            info!("batch {}/{} done ({}%)", batch, batches, progress);
        }

        self.collection.end_generation().await;
        match &outcome {
            Ok(_) => self.alerts.success(format!(
                "Successfully generated {} dummy notes.",
                records
            )),
            Err(e) => {
                error!("dummy data generation aborted: {}", e);
                self.alerts.error("Failed to generate dummy notes.");
            }
        }

        // A failed reload has already raised its own alert
        let _ = self.collection.reload().await;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertKind;
    use crate::api::memory::{ApiCall, ApiOp, InMemoryNotesApi};
    use crate::collection::Activity;
    use std::time::Duration;

    async fn setup() -> (Arc<InMemoryNotesApi>, CollectionController, AlertController, BulkGenerationController) {
        let api = Arc::new(InMemoryNotesApi::new());
        let alerts = AlertController::new(Duration::from_millis(3000));
        let collection = CollectionController::new(api.clone(), alerts.clone(), 10);
        collection.load_page(1).await.unwrap();
        let bulk = BulkGenerationController::new(api.clone(), collection.clone(), alerts.clone());
        (api, collection, alerts, bulk)
    }

    #[tokio::test]
    async fn test_generates_in_sequential_batches() {
        let (api, collection, alerts, bulk) = setup().await;

        let mut progress = Vec::new();
        let report = bulk
            .run_with_progress(100, 10, |p| progress.push(p))
            .await
            .unwrap();

        assert_eq!(report, GenerationReport { batches: 10, records: 100 });
        assert_eq!(progress, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(
            api.calls_of(ApiOp::GenerateBatch),
            vec![ApiCall::GenerateBatch(10); 10]
        );
        assert_eq!(api.calls().last(), Some(&ApiCall::ListPage(1)));
        assert_eq!(api.notes().len(), 100);

        let alert = alerts.current().unwrap();
        assert_eq!(alert.kind, AlertKind::Success);
        assert_eq!(alert.message, "Successfully generated 100 dummy notes.");

        let snapshot = collection.snapshot().await;
        assert_eq!(snapshot.activity, Activity::Idle);
        assert_eq!(snapshot.total_pages, 10);
        assert_eq!(snapshot.view.notes().len(), 10);
    }

    #[tokio::test]
    async fn test_failed_batch_aborts_and_still_reloads() {
        let (api, collection, alerts, bulk) = setup().await;
        api.fail_call(ApiOp::GenerateBatch, 5);

        let mut progress = Vec::new();
        let err = bulk
            .run_with_progress(100, 10, |p| progress.push(p))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BulkError::BatchFailed {
                batch: 5,
                completed: 4,
                ..
            }
        ));
        assert_eq!(progress, vec![10, 20, 30, 40]);
        assert_eq!(api.calls_of(ApiOp::GenerateBatch).len(), 5);
        assert_eq!(api.calls().last(), Some(&ApiCall::ListPage(1)));

        let alert = alerts.current().unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, "Failed to generate dummy notes.");

        let snapshot = collection.snapshot().await;
        assert_eq!(snapshot.activity, Activity::Idle);
        assert_eq!(snapshot.total_pages, 4, "the 40 notes that did land are shown");
    }

    #[tokio::test]
    async fn test_progress_rounds_down() {
        let (_api, _collection, _alerts, bulk) = setup().await;

        let mut progress = Vec::new();
        bulk.run_with_progress(30, 10, |p| progress.push(p))
            .await
            .unwrap();
        assert_eq!(progress, vec![33, 66, 100]);
    }

    #[tokio::test]
    async fn test_run_without_a_full_batch_is_refused() {
        let (api, collection, alerts, bulk) = setup().await;
        let calls_before = api.calls().len();

        assert_eq!(
            bulk.run(100, 0).await,
            Err(BulkError::NoBatches {
                total_records: 100,
                batch_size: 0
            })
        );
        assert!(matches!(
            bulk.run(5, 10).await,
            Err(BulkError::NoBatches { .. })
        ));

        assert_eq!(api.calls().len(), calls_before);
        assert_eq!(alerts.current().unwrap().kind, AlertKind::Warning);
        assert_eq!(collection.activity().await, Activity::Idle);
    }

    #[tokio::test]
    async fn test_second_run_rejected_while_generating() {
        let (api, collection, _alerts, bulk) = setup().await;
        assert!(collection.begin_generation().await);

        assert_eq!(bulk.run(100, 10).await, Err(BulkError::AlreadyRunning));
        assert!(api.calls_of(ApiOp::GenerateBatch).is_empty());
        assert!(collection.activity().await.is_generating());
    }
}
