// src/metrics.rs
use std::path::Path;

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const FETCHED: &str = "news_fetched_total";
pub const PARSE_ERRORS: &str = "news_parse_errors_total";
pub const FETCH_ERRORS: &str = "news_fetch_errors_total";
pub const CACHE_HITS: &str = "news_cache_hits_total";
pub const CLASSIFIED: &str = "news_classified_total";
pub const CLASSIFY_ERRORS: &str = "news_classify_errors_total";
pub const PERSISTED: &str = "news_persisted_total";
pub const STORE_ERRORS: &str = "news_store_errors_total";
pub const NOTIFIED: &str = "news_notified_total";
pub const NOTIFY_ERRORS: &str = "news_notify_errors_total";
pub const LAST_RUN_TS: &str = "news_pipeline_last_run_ts";

/// One-time metrics registration, so every series shows up even at zero.
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(FETCHED, "News items parsed from the source API.");
        describe_counter!(PARSE_ERRORS, "Source entries skipped because they failed to parse.");
        describe_counter!(FETCH_ERRORS, "Source requests that failed as a whole.");
        describe_counter!(CACHE_HITS, "Items already present in the recency window.");
        describe_counter!(CLASSIFIED, "Items labelled by the language model.");
        describe_counter!(CLASSIFY_ERRORS, "Items dropped because classification failed.");
        describe_counter!(PERSISTED, "Documents written to storage.");
        describe_counter!(STORE_ERRORS, "Failed cache reads and bulk writes.");
        describe_counter!(NOTIFIED, "Chat messages delivered.");
        describe_counter!(NOTIFY_ERRORS, "Chat messages that failed to send.");
        describe_gauge!(LAST_RUN_TS, "Unix ts when the pipeline last finished.");
    });
}

/// Prometheus recorder for a run-once process: nothing listens, the rendering is
/// written to a textfile when the run ends.
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    pub fn install() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        ensure_described();
        Ok(Self { handle })
    }

    /// Write the exposition format atomically (tmp file + rename).
    pub fn write_textfile(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("prom.tmp");
        std::fs::write(&tmp, self.handle.render())
            .with_context(|| format!("writing metrics to {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("renaming metrics into {}", path.display()))?;
        Ok(())
    }
}
