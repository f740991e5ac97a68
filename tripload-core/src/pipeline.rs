//! Ingestion run: expand → enumerate → fetch → aggregate → normalize.

use crate::aggregate::aggregate;
use crate::calendar::months_between;
use crate::config::{ConfigError, IngestConfig, RunWindow};
use crate::enumerate::{collect_tables, work_units, IngestSummary};
use crate::fetch::{Fetcher, TripSource};
use crate::normalize::normalize;
use crate::observer::IngestObserver;
use crate::schema::{SchemaError, TripSchema};
use polars::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("table operation failed: {0}")]
    Table(#[from] PolarsError),

    #[error("normalized table violates the output contract: {0}")]
    Schema(#[from] SchemaError),
}

/// Final table of one run plus what happened along the way.
#[derive(Debug, Clone)]
pub struct IngestRun {
    pub table: DataFrame,
    pub summary: IngestSummary,
}

/// Run one ingestion over `window`.
///
/// Unit-level failures are absorbed (see [`Fetcher`]); when nothing is
/// retrieved the result is an empty table with the canonical columns.
pub fn run_ingestion(
    window: &RunWindow,
    config: &IngestConfig,
    source: &dyn TripSource,
    observer: &dyn IngestObserver,
) -> Result<IngestRun, IngestError> {
    let months = months_between(window.start(), window.end());
    let units = work_units(&config.variants, &months);
    observer.on_run_start(window, units.len(), source.name());

    let fetcher = Fetcher::new(source, observer);
    let (tables, summary) = collect_tables(&units, &config.locator, &fetcher, observer);

    let table = normalize(aggregate(tables)?)?;
    TripSchema::validate(&table)?;

    observer.on_run_complete(&summary);
    Ok(IngestRun { table, summary })
}
