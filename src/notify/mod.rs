// src/notify/mod.rs
pub mod format;
pub mod telegram;

use async_trait::async_trait;
use metrics::counter;

use crate::error::NotifyError;
use crate::metrics::{NOTIFIED, NOTIFY_ERRORS};
use crate::pipeline::{PipelineState, StateUpdate};
use crate::types::ClassifiedNewsItem;

pub use telegram::TelegramNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one pre-rendered message.
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub attempted: usize,
    pub sent: usize,
}

/// Send one message per item; a failed send never stops the rest.
pub async fn send_all(notifier: &dyn Notifier, items: &[ClassifiedNewsItem]) -> NotifyReport {
    let mut report = NotifyReport::default();
    for item in items {
        report.attempted += 1;
        let text = format::render_message(item);
        match notifier.send(&text).await {
            Ok(()) => {
                report.sent += 1;
                counter!(NOTIFIED).increment(1);
            }
            Err(e) => {
                tracing::error!(
                    id = %item.id,
                    error = %e,
                    channel = notifier.name(),
                    "notification failed"
                );
                counter!(NOTIFY_ERRORS).increment(1);
            }
        }
    }
    report
}

/// Notification step: `notified` is true iff at least one message went out.
pub async fn notify(notifier: &dyn Notifier, state: &PipelineState) -> StateUpdate {
    if state.classified_items.is_empty() {
        tracing::info!("no new items for notification");
        return StateUpdate::empty();
    }
    let report = send_all(notifier, &state.classified_items).await;
    tracing::info!(
        sent = report.sent,
        attempted = report.attempted,
        channel = notifier.name(),
        "notifications sent"
    );
    StateUpdate::notified(report.sent > 0)
}
