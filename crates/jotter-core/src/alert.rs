use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertKind::Success => "success",
            AlertKind::Error => "error",
            AlertKind::Warning => "warning",
            AlertKind::Info => "info",
        };
        f.write_str(label)
    }
}

/// The single visible status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Distinguishes successive alerts with identical text
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
    pub expires_at: Instant,
}

struct AlertInner {
    tx: watch::Sender<Option<Alert>>,
    /// Auto-dismiss task of the current alert; at most one is live
    timer: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
    duration: Duration,
}

/// Owns the transient alert shown after each operation.
///
/// Cheap to clone; every clone drives the same alert. Observers subscribe
/// to changes through [`AlertController::subscribe`].
///
/// `show` spawns the auto-dismiss timer, so it must run inside a tokio runtime.
#[derive(Clone)]
pub struct AlertController {
    inner: Arc<AlertInner>,
}

impl AlertController {
    pub fn new(duration: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(AlertInner {
                tx,
                timer: Mutex::new(None),
                next_id: AtomicU64::new(1),
                duration,
            }),
        }
    }

    /// Replace the current alert and restart the dismiss timer.
    pub fn show(&self, kind: AlertKind, message: impl Into<String>) {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let expires_at = Instant::now() + self.inner.duration;
        let alert = Alert {
            id,
            kind,
            message: message.into(),
            expires_at,
        };

        let mut timer = self.lock_timer();
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        self.inner.tx.send_replace(Some(alert));

        let inner = Arc::clone(&self.inner);
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            // An aborted timer never gets here; the id check covers a timer
            // that had already woken when it was replaced.
            inner.tx.send_if_modified(|current| match current {
                Some(alert) if alert.id == id => {
                    *current = None;
                    true
                }
                _ => false,
            });
        }));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(AlertKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(AlertKind::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(AlertKind::Warning, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(AlertKind::Info, message);
    }

    /// Clear the alert now and cancel its pending timer.
    pub fn dismiss(&self) {
        let mut timer = self.lock_timer();
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        self.inner.tx.send_if_modified(|current| current.take().is_some());
    }

    pub fn current(&self) -> Option<Alert> {
        self.inner.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Alert>> {
        self.inner.tx.subscribe()
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn controller() -> AlertController {
        AlertController::new(Duration::from_millis(3000))
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_auto_dismisses() {
        let alerts = controller();
        alerts.success("Note added successfully.");

        let shown = alerts.current().unwrap();
        assert_eq!(shown.kind, AlertKind::Success);
        assert_eq!(shown.message, "Note added successfully.");

        sleep(Duration::from_millis(2999)).await;
        assert!(alerts.current().is_some());

        sleep(Duration::from_millis(2)).await;
        assert!(alerts.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacement_restarts_timer() {
        let alerts = controller();
        alerts.error("Failed to load notes.");

        sleep(Duration::from_millis(2000)).await;
        alerts.success("Note deleted successfully.");

        // The first alert's timer would have fired at 3000ms
        sleep(Duration::from_millis(1500)).await;
        let current = alerts.current().unwrap();
        assert_eq!(current.message, "Note deleted successfully.");

        sleep(Duration::from_millis(1501)).await;
        assert!(alerts.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacement_clears_exactly_once() {
        let alerts = controller();
        let mut rx = alerts.subscribe();
        let observer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                let message = rx.borrow_and_update().as_ref().map(|a| a.message.clone());
                seen.push(message);
            }
            seen
        });

        alerts.info("first");
        sleep(Duration::from_millis(100)).await;
        alerts.info("second");
        sleep(Duration::from_millis(5000)).await;
        drop(alerts);

        let seen = observer.await.unwrap();
        assert_eq!(
            seen,
            vec![Some("first".to_string()), Some("second".to_string()), None]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismiss_cancels_timer() {
        let alerts = controller();
        let mut rx = alerts.subscribe();

        alerts.warning("Please enter a valid page number.");
        let _ = rx.borrow_and_update();
        alerts.dismiss();
        assert!(alerts.current().is_none());
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        sleep(Duration::from_millis(5000)).await;
        assert!(!rx.has_changed().unwrap(), "no clear after manual dismiss");
    }

    #[tokio::test]
    async fn test_dismiss_without_alert_is_noop() {
        let alerts = controller();
        let rx = alerts.subscribe();
        alerts.dismiss();
        assert!(!rx.has_changed().unwrap());
    }
}
