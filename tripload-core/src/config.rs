//! Run configuration: the date window and the variable bundle supplied by the
//! orchestrator.

use crate::locator::SourceLocator;
use crate::observer::IngestObserver;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Variant pulled when the bundle names none.
pub const DEFAULT_VARIANT: &str = "yellow";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} '{value}' (expected YYYY-MM-DD): {source}")]
    InvalidDate {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("malformed variable bundle: {0}")]
    MalformedVars(String),
}

/// Inclusive calendar-date window for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl RunWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Single-day window on `day`.
    pub fn on(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Build the window from raw orchestrator values.
    ///
    /// If either bound is missing or blank, both default to `today`. Present
    /// values must parse as `YYYY-MM-DD`; a bad value is a hard error.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, ConfigError> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());

        match (start, end) {
            (Some(start), Some(end)) => Ok(Self::new(
                parse_date("start date", start)?,
                parse_date("end date", end)?,
            )),
            _ => Ok(Self::on(today)),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| ConfigError::InvalidDate {
        field,
        value: value.to_string(),
        source,
    })
}

/// Recognized keys of the orchestrator's JSON variable bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineVars {
    pub taxi_types: Vec<String>,
}

impl PipelineVars {
    /// Strict parse. A missing or blank bundle is the empty configuration.
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Self::default()),
            Some(raw) => {
                serde_json::from_str(raw).map_err(|e| ConfigError::MalformedVars(e.to_string()))
            }
        }
    }
}

/// Everything the ingestion run needs beyond the date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub variants: Vec<String>,
    pub locator: SourceLocator,
}

impl IngestConfig {
    pub fn from_vars(vars: PipelineVars) -> Self {
        let variants = if vars.taxi_types.is_empty() {
            vec![DEFAULT_VARIANT.to_string()]
        } else {
            vars.taxi_types
        };

        Self {
            variants,
            locator: SourceLocator::default(),
        }
    }

    /// Lenient parse: a malformed bundle is reported and treated as empty.
    pub fn from_bundle(raw: Option<&str>, observer: &dyn IngestObserver) -> Self {
        let vars = PipelineVars::parse(raw).unwrap_or_else(|e| {
            observer.on_config_fallback(&e);
            PipelineVars::default()
        });
        Self::from_vars(vars)
    }

    pub fn with_locator(mut self, locator: SourceLocator) -> Self {
        self.locator = locator;
        self
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::from_vars(PipelineVars::default())
    }
}
