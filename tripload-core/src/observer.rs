//! Observer seam for ingestion events.
//!
//! Components report what happened through an injected [`IngestObserver`]
//! rather than a global logger, so tests can run silently or record events.
//! Every method has a no-op default.

use crate::config::{ConfigError, RunWindow};
use crate::enumerate::{IngestSummary, WorkUnit};
use crate::fetch::{FetchError, FileFormat};
use polars::prelude::PolarsError;
use tracing::{debug, info, warn};

pub trait IngestObserver: Send + Sync {
    /// The variable bundle could not be used; defaults apply.
    fn on_config_fallback(&self, _error: &ConfigError) {}

    /// Called once the unit list is known.
    fn on_run_start(&self, _window: &RunWindow, _units: usize, _source: &str) {}

    /// The primary address failed and the fallback address is about to be tried.
    fn on_fallback(&self, _url: &str, _fallback: &str, _error: &FetchError) {}

    /// The fallback address failed too.
    fn on_unavailable(&self, _url: &str, _error: &FetchError) {}

    /// A file decoded cleanly but held no rows.
    fn on_empty(&self, _url: &str) {}

    fn on_retrieved(&self, _unit: &WorkUnit, _rows: usize, _format: FileFormat) {}

    /// A retrieved table could not be stamped with provenance columns.
    fn on_stamp_failed(&self, _unit: &WorkUnit, _error: &PolarsError) {}

    fn on_skipped(&self, _unit: &WorkUnit) {}

    fn on_run_complete(&self, _summary: &IngestSummary) {}
}

/// Emits every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl IngestObserver for TracingObserver {
    fn on_config_fallback(&self, error: &ConfigError) {
        warn!(error = %error, "ignoring variable bundle, using defaults");
    }

    fn on_run_start(&self, window: &RunWindow, units: usize, source: &str) {
        info!(
            start = %window.start(),
            end = %window.end(),
            units,
            source,
            "starting trip ingestion"
        );
    }

    fn on_fallback(&self, url: &str, fallback: &str, error: &FetchError) {
        warn!(url, fallback, error = %error, "primary fetch failed, trying fallback");
    }

    fn on_unavailable(&self, url: &str, error: &FetchError) {
        warn!(url, error = %error, "fallback fetch failed");
    }

    fn on_empty(&self, url: &str) {
        debug!(url, "file has no rows");
    }

    fn on_retrieved(&self, unit: &WorkUnit, rows: usize, format: FileFormat) {
        debug!(unit = %unit, rows, format = %format, "retrieved");
    }

    fn on_stamp_failed(&self, unit: &WorkUnit, error: &PolarsError) {
        warn!(unit = %unit, error = %error, "provenance stamping failed");
    }

    fn on_skipped(&self, unit: &WorkUnit) {
        warn!(unit = %unit, "skipping unavailable unit");
    }

    fn on_run_complete(&self, summary: &IngestSummary) {
        info!(
            total = summary.total,
            retrieved = summary.retrieved,
            skipped = summary.skipped.len(),
            via_fallback = summary.via_fallback,
            rows = summary.rows,
            "trip ingestion complete"
        );
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl IngestObserver for SilentObserver {}
