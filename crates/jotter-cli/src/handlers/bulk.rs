use jotter_core::error::BulkError;
use jotter_core::NotesEngine;
use log::warn;

use crate::render::render_progress;

/// Handle "generate [total [batch]]"
///
/// Progress lines are returned in the order the batches completed.
pub async fn handle_generate(engine: &NotesEngine, total: u32, batch: u32) -> Vec<String> {
    if batch == 0 || batch > total || total % batch != 0 {
        return vec![format!(
            "Batch size {} must evenly divide the total of {}.",
            batch, total
        )];
    }

    let mut lines = Vec::new();
    let result = engine
        .bulk
        .run_with_progress(total, batch, |progress| {
            lines.push(render_progress(progress))
        })
        .await;
    match result {
        Ok(report) => lines.push(format!(
            "{} notes created in {} batches.",
            report.records, report.batches
        )),
        Err(BulkError::AlreadyRunning | BulkError::NoBatches { .. }) => {}
        Err(BulkError::BatchFailed {
            batch, completed, ..
        }) => {
            warn!("generation stopped at batch {}", batch);
            lines.push(format!("Stopped after {} completed batches.", completed));
        }
    }
    lines
}
