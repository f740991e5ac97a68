//! Tripload task: one ingestion run per invocation.
//!
//! The orchestrator supplies:
//! - `BRUIN_START_DATE` / `BRUIN_END_DATE`: run window (YYYY-MM-DD)
//! - `BRUIN_VARS`: JSON variable bundle, e.g. `{"taxi_types": ["yellow", "green"]}`
//!
//! The final table is streamed to stdout as Parquet for the materializer;
//! logs go to stderr (`RUST_LOG`, default `info`).

use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use tripload_core::{run_ingestion, HttpSource, IngestConfig, RunWindow, TracingObserver};

const START_DATE_VAR: &str = "BRUIN_START_DATE";
const END_DATE_VAR: &str = "BRUIN_END_DATE";
const VARS_VAR: &str = "BRUIN_VARS";

fn main() -> Result<()> {
    init_tracing();

    let start = std::env::var(START_DATE_VAR).ok();
    let end = std::env::var(END_DATE_VAR).ok();
    let vars = std::env::var(VARS_VAR).ok();

    let today = chrono::Utc::now().date_naive();
    let window = RunWindow::resolve(start.as_deref(), end.as_deref(), today)
        .context("invalid run window")?;

    let observer = TracingObserver;
    let config = IngestConfig::from_bundle(vars.as_deref(), &observer);
    let source = HttpSource::new()?;

    let mut run = run_ingestion(&window, &config, &source, &observer)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    ParquetWriter::new(&mut out)
        .finish(&mut run.table)
        .context("writing final table to stdout")?;
    out.flush()?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
