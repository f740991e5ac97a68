use crate::schema::TripSchema;
use polars::prelude::*;

/// Stack retrieved tables by column-name union.
///
/// Columns missing from a table are null in its rows, and a column whose type
/// drifted between files is widened to the common supertype. Row order follows
/// `tables`. No tables yields [`TripSchema::empty_raw`].
pub fn aggregate(tables: Vec<DataFrame>) -> PolarsResult<DataFrame> {
    if tables.is_empty() {
        return Ok(TripSchema::empty_raw());
    }

    let frames: Vec<LazyFrame> = tables.into_iter().map(|df| df.lazy()).collect();
    concat(
        frames,
        UnionArgs {
            rechunk: true,
            to_supertypes: true,
            diagonal: true,
            ..Default::default()
        },
    )?
    .collect()
}
