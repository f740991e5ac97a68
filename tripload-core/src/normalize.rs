//! Schema normalization for the combined trip table.
//!
//! Column names drifted across years and variants. Each canonical column is
//! described by a [`ColumnRule`]: its aliases in priority order and how
//! co-occurring aliases are resolved. All rules run through one
//! procedure, [`resolve`]. Afterwards every canonical column that is still
//! absent is added as a typed null column, and the trip datetimes are
//! coerced to a datetime type.

use crate::schema::{
    datetime_dtype, TripSchema, DROPOFF_DATETIME, DROPOFF_LOCATION_ID, FARE_AMOUNT,
    PAYMENT_TYPE, PICKUP_DATETIME, PICKUP_LOCATION_ID, TIME_UNIT, VENDOR_ID,
};
use chrono::NaiveDateTime;
use polars::prelude::*;

/// How to resolve a target when several of its aliases are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Rename the first present alias; leave the others untouched.
    FirstPresent,
    /// Take, row by row, the first non-null value across the present aliases,
    /// then drop the consumed aliases. Only for true synonyms.
    Coalesce,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnRule {
    pub target: &'static str,
    pub aliases: &'static [&'static str],
    pub resolution: Resolution,
}

pub const RULES: &[ColumnRule] = &[
    ColumnRule {
        target: PICKUP_DATETIME,
        aliases: &["tpep_pickup_datetime", "lpep_pickup_datetime", PICKUP_DATETIME],
        resolution: Resolution::Coalesce,
    },
    ColumnRule {
        target: DROPOFF_DATETIME,
        aliases: &["tpep_dropoff_datetime", "lpep_dropoff_datetime", DROPOFF_DATETIME],
        resolution: Resolution::Coalesce,
    },
    ColumnRule {
        target: PICKUP_LOCATION_ID,
        aliases: &["PULocationID", "pulocationid", "PUlocationID", PICKUP_LOCATION_ID],
        resolution: Resolution::Coalesce,
    },
    ColumnRule {
        target: DROPOFF_LOCATION_ID,
        aliases: &["DOLocationID", "dolocationid", "DOlocationID", DROPOFF_LOCATION_ID],
        resolution: Resolution::Coalesce,
    },
    // "fare" outranks "total": eras that only publish a total are reported as fare.
    ColumnRule {
        target: FARE_AMOUNT,
        aliases: &[FARE_AMOUNT, "fare", "total_amount", "total"],
        resolution: Resolution::FirstPresent,
    },
    // Raw code, not resolved against a lookup.
    ColumnRule {
        target: PAYMENT_TYPE,
        aliases: &[PAYMENT_TYPE, "payment_type_id", "paymenttype", "payment"],
        resolution: Resolution::FirstPresent,
    },
    ColumnRule {
        target: VENDOR_ID,
        aliases: &["VendorID", "vendor_id", VENDOR_ID],
        resolution: Resolution::Coalesce,
    },
];

/// Accepted string layouts for trip datetimes, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Reconcile `df` into the canonical column set.
///
/// Idempotent: normalizing an already canonical table returns it unchanged.
pub fn normalize(mut df: DataFrame) -> PolarsResult<DataFrame> {
    for rule in RULES {
        resolve(&mut df, rule)?;
    }
    fill_missing(&mut df)?;
    coerce_datetime(&mut df, PICKUP_DATETIME)?;
    coerce_datetime(&mut df, DROPOFF_DATETIME)?;
    Ok(df)
}

/// Apply one rule in place.
pub fn resolve(df: &mut DataFrame, rule: &ColumnRule) -> PolarsResult<()> {
    let present: Vec<&'static str> = rule
        .aliases
        .iter()
        .copied()
        .filter(|alias| df.get_column_index(alias).is_some())
        .collect();

    let Some(&first) = present.first() else {
        return Ok(());
    };

    if rule.resolution == Resolution::FirstPresent || present.len() == 1 {
        return rename_into(df, first, rule.target);
    }

    let merged = present[1..]
        .iter()
        .fold(col(first), |acc, &alias| {
            when(acc.clone().is_not_null()).then(acc).otherwise(col(alias))
        })
        .alias(rule.target);
    let column = df
        .clone()
        .lazy()
        .select([merged])
        .collect()?
        .column(rule.target)?
        .clone();

    for &alias in present.iter().filter(|&&alias| alias != rule.target) {
        df.drop_in_place(alias)?;
    }
    df.with_column(column)?;
    Ok(())
}

fn rename_into(df: &mut DataFrame, from: &str, target: &str) -> PolarsResult<()> {
    if from == target {
        return Ok(());
    }
    if df.get_column_index(target).is_some() {
        df.drop_in_place(target)?;
    }
    df.rename(from, target.into())?;
    Ok(())
}

/// Add every absent canonical column, null-filled with its canonical type.
fn fill_missing(df: &mut DataFrame) -> PolarsResult<()> {
    let height = df.height();
    for field in TripSchema::canonical().iter_fields() {
        if df.get_column_index(field.name()).is_none() {
            df.with_column(Column::full_null(field.name().clone(), height, field.dtype()))?;
        }
    }
    Ok(())
}

/// Coerce `name` to a microsecond datetime; unparsable values become null.
fn coerce_datetime(df: &mut DataFrame, name: &str) -> PolarsResult<()> {
    let target = datetime_dtype();
    let column = df.column(name)?;
    if column.dtype() == &target {
        return Ok(());
    }

    let coerced = match column.dtype() {
        DataType::String => parse_datetimes(column.as_materialized_series().str()?),
        _ => column.as_materialized_series().cast(&target)?,
    };
    df.with_column(coerced)?;
    Ok(())
}

fn parse_datetimes(values: &StringChunked) -> Series {
    let micros: Int64Chunked = values
        .into_iter()
        .map(|v| {
            v.and_then(parse_datetime)
                .map(|dt| dt.and_utc().timestamp_micros())
        })
        .collect();

    micros
        .with_name(values.name().clone())
        .into_datetime(TIME_UNIT, None)
        .into_series()
}

/// Parse one datetime string in any accepted layout; a bare date is midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
