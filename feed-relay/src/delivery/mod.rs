pub mod telegram;

pub use telegram::TelegramSink;

use crate::types::{AuditLog, DeliverySink, DispatchReport, FeedEntry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message text for one post: author line if known, then title, then link.
pub fn display_message(entry: &FeedEntry) -> String {
    match entry.author.as_deref() {
        Some(author) => format!("{}\n{}\n{}", author, entry.title, entry.link),
        None => format!("{}\n{}", entry.title, entry.link),
    }
}

/// Audit trail written through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, batch: &[FeedEntry]) {
        for entry in batch {
            info!("{} {}", entry.title, entry.link);
        }
    }
}

pub struct Dispatcher {
    audit: Arc<dyn AuditLog>,
    sink: Option<Arc<dyn DeliverySink>>,
}

impl Dispatcher {
    pub fn new(audit: Arc<dyn AuditLog>, sink: Arc<dyn DeliverySink>) -> Self {
        Self {
            audit,
            sink: Some(sink),
        }
    }

    /// Logs the batch and sends nothing.
    pub fn dry_run(audit: Arc<dyn AuditLog>) -> Self {
        Self { audit, sink: None }
    }

    pub fn is_dry_run(&self) -> bool {
        self.sink.is_none()
    }

    /// Every post is audited, then sent on its own. A failed send is logged
    /// and skipped.
    pub async fn dispatch(&self, batch: &[FeedEntry]) -> DispatchReport {
        self.audit.record(batch);

        let Some(sink) = &self.sink else {
            debug!("Dry run: skipping delivery of {} posts", batch.len());
            return DispatchReport::default();
        };

        let mut report = DispatchReport::default();
        for entry in batch {
            report.attempted += 1;
            match sink.deliver(entry).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!("Failed to deliver {}: {:#}", entry.link, e);
                }
            }
        }

        info!(
            "Delivered {}/{} posts ({} failed)",
            report.delivered, report.attempted, report.failed
        );
        report
    }
}
