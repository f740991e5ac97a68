//! Property tests for calendar expansion and address building.
//!
//! Uses proptest to verify:
//! 1. Month count — one entry per calendar month touched, inclusive
//! 2. Contiguity — consecutive entries are exactly one month apart
//! 3. Idempotence — re-expanding the output's own range reproduces it
//! 4. Address shape — zero-padded `YYYY-MM` on a fixed stem

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use tripload_core::{fallback_address, months_between, SourceLocator, YearMonth};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 2009-01-01 (start of the archive) through roughly 2035.
    (0i64..9_500).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2009, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

fn arb_window() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (arb_date(), 0i64..1_500)
        .prop_map(|(start, span)| (start, start + chrono::Duration::days(span)))
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

// ── 1. Month count ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn expansion_covers_every_touched_month((start, end) in arb_window()) {
        let months = months_between(start, end);
        let expected = month_index(end.year(), end.month())
            - month_index(start.year(), start.month())
            + 1;
        prop_assert_eq!(months.len() as i64, expected);
        prop_assert_eq!(months.first().copied(), Some(YearMonth::of(start)));
        prop_assert_eq!(months.last().copied(), Some(YearMonth::of(end)));
    }
}

// ── 2. Contiguity ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn consecutive_months_step_by_one((start, end) in arb_window()) {
        let months = months_between(start, end);
        for pair in months.windows(2) {
            prop_assert!(pair[0] < pair[1]);
            prop_assert_eq!(pair[0].succ(), pair[1]);
            prop_assert!((1..=12).contains(&pair[1].month()));
        }
    }
}

// ── 3. Idempotence ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn reexpansion_is_idempotent((start, end) in arb_window()) {
        let months = months_between(start, end);
        let first = months.first().unwrap().first_day().unwrap();
        let last = months.last().unwrap().first_day().unwrap();
        prop_assert_eq!(months_between(first, last), months);
    }

    #[test]
    fn inverted_windows_are_empty((start, end) in arb_window()) {
        prop_assume!(YearMonth::of(start) < YearMonth::of(end));
        prop_assert!(months_between(end, start).is_empty());
    }
}

// ── 4. Address shape ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn addresses_are_zero_padded(
        variant in "[a-z]{3,8}",
        year in 2009i32..2100,
        month in 1u32..=12,
    ) {
        let url = SourceLocator::default().locate(&variant, year, month);
        let suffix = format!("/trip-data/{variant}_tripdata_{year:04}-{month:02}.parquet");
        prop_assert!(url.ends_with(&suffix), "{} does not end with {}", url, suffix);

        let fallback = fallback_address(&url);
        prop_assert_eq!(fallback.trim_end_matches(".csv"), url.trim_end_matches(".parquet"));
    }
}
