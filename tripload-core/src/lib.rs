//! Tripload Core: monthly trip-record ingestion.
//!
//! - Calendar expansion of a run window into months
//! - Deterministic retrieval addresses per (variant, month)
//! - Parquet fetch with CSV fallback, tolerant of missing months
//! - Column-union aggregation and schema normalization into one canonical table

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod enumerate;
pub mod fetch;
pub mod locator;
pub mod normalize;
pub mod observer;
pub mod pipeline;
pub mod schema;

pub use aggregate::aggregate;
pub use calendar::{months_between, YearMonth};
pub use config::{ConfigError, IngestConfig, PipelineVars, RunWindow, DEFAULT_VARIANT};
pub use enumerate::{work_units, IngestSummary, WorkUnit};
pub use fetch::{FetchError, FetchOutcome, Fetcher, FileFormat, HttpSource, TripSource};
pub use locator::{fallback_address, SourceLocator};
pub use normalize::normalize;
pub use observer::{IngestObserver, SilentObserver, TracingObserver};
pub use pipeline::{run_ingestion, IngestError, IngestRun};
pub use schema::TripSchema;
