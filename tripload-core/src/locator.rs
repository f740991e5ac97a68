//! Retrieval addresses for monthly trip-record files.

use crate::calendar::YearMonth;
use serde::{Deserialize, Serialize};

/// Public CDN hosting the monthly trip-record archive.
pub const DEFAULT_BASE_URL: &str = "https://d37ci6vzurychx.cloudfront.net";

const PRIMARY_SUFFIX: &str = ".parquet";
const FALLBACK_SUFFIX: &str = ".csv";

/// Builds `<base>/trip-data/<variant>_tripdata_<YYYY>-<MM>.parquet` addresses.
///
/// Variant tags are not validated; an unknown tag produces an address that
/// simply fails to retrieve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocator {
    base_url: String,
}

impl SourceLocator {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Primary (Parquet) address for one variant-month.
    pub fn locate(&self, variant: &str, year: i32, month: u32) -> String {
        format!(
            "{}/trip-data/{variant}_tripdata_{year:04}-{month:02}{PRIMARY_SUFFIX}",
            self.base_url
        )
    }

    pub fn locate_month(&self, variant: &str, month: YearMonth) -> String {
        self.locate(variant, month.year(), month.month())
    }
}

impl Default for SourceLocator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Same stem as `url` with the delimited-text extension.
pub fn fallback_address(url: &str) -> String {
    match url.strip_suffix(PRIMARY_SUFFIX) {
        Some(stem) => format!("{stem}{FALLBACK_SUFFIX}"),
        None => format!("{url}{FALLBACK_SUFFIX}"),
    }
}
