//! Work enumeration: variants × months, fetched strictly in order.

use crate::calendar::YearMonth;
use crate::fetch::{FetchOutcome, FileFormat, Fetcher};
use crate::locator::SourceLocator;
use crate::observer::IngestObserver;
use crate::schema::{EXTRACTED_AT, TAXI_TYPE, TIME_UNIT};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use std::fmt;

/// One (variant, month) retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkUnit {
    pub variant: String,
    pub month: YearMonth,
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.variant, self.month)
    }
}

/// Cross product in variant-major, then chronological, order.
pub fn work_units(variants: &[String], months: &[YearMonth]) -> Vec<WorkUnit> {
    variants
        .iter()
        .flat_map(|variant| {
            months.iter().map(move |&month| WorkUnit {
                variant: variant.clone(),
                month,
            })
        })
        .collect()
}

/// Outcome counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub total: usize,
    pub retrieved: usize,
    pub skipped: Vec<WorkUnit>,
    /// Units served by the CSV fallback.
    pub via_fallback: usize,
    pub rows: usize,
}

impl IngestSummary {
    pub fn all_retrieved(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Append the provenance columns, replacing any same-named source columns.
pub fn stamp_provenance(
    mut table: DataFrame,
    variant: &str,
    extracted_at: DateTime<Utc>,
) -> PolarsResult<DataFrame> {
    let height = table.height();
    let stamp = Int64Chunked::full(EXTRACTED_AT.into(), extracted_at.timestamp_micros(), height)
        .into_datetime(TIME_UNIT, None);
    let tag = StringChunked::full(TAXI_TYPE.into(), variant, height);

    table.with_column(stamp.into_series())?;
    table.with_column(tag.into_series())?;
    Ok(table)
}

/// Fetch every unit in order and return the stamped, non-empty tables.
///
/// Unavailable units are reported and skipped; the loop never stops early.
pub fn collect_tables(
    units: &[WorkUnit],
    locator: &SourceLocator,
    fetcher: &Fetcher<'_>,
    observer: &dyn IngestObserver,
) -> (Vec<DataFrame>, IngestSummary) {
    let mut tables = Vec::with_capacity(units.len());
    let mut summary = IngestSummary {
        total: units.len(),
        ..Default::default()
    };

    for unit in units {
        let url = locator.locate_month(&unit.variant, unit.month);

        let retrieved = match fetcher.fetch(&url) {
            FetchOutcome::Retrieved(r) => r,
            FetchOutcome::Unavailable => {
                observer.on_skipped(unit);
                summary.skipped.push(unit.clone());
                continue;
            }
        };

        let format = retrieved.format;
        let stamped = stamp_provenance(retrieved.table, &unit.variant, Utc::now());
        if let Some(table) = admit(unit, stamped, format, &mut summary, observer) {
            tables.push(table);
        }
    }

    (tables, summary)
}

/// Record one retrieved unit, or skip it when stamping failed.
fn admit(
    unit: &WorkUnit,
    stamped: PolarsResult<DataFrame>,
    format: FileFormat,
    summary: &mut IngestSummary,
    observer: &dyn IngestObserver,
) -> Option<DataFrame> {
    match stamped {
        Ok(table) => {
            let rows = table.height();
            observer.on_retrieved(unit, rows, format);
            summary.retrieved += 1;
            summary.rows += rows;
            if format == FileFormat::Csv {
                summary.via_fallback += 1;
            }
            Some(table)
        }
        Err(e) => {
            observer.on_stamp_failed(unit, &e);
            observer.on_skipped(unit);
            summary.skipped.push(unit.clone());
            None
        }
    }
}
