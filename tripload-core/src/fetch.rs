//! Single-file retrieval with a Parquet → CSV fallback.
//!
//! The archive has published some months in only one of the two formats, so
//! a unit is tried as Parquet first and as CSV at the same stem second. A unit
//! that fails both, or decodes to zero rows, is reported as
//! [`FetchOutcome::Unavailable`]; the fetcher never returns an error.

use crate::locator::fallback_address;
use crate::observer::IngestObserver;
use crate::pipeline::IngestError;
use polars::prelude::*;
use std::fmt;
use std::io::Cursor;
use thiserror::Error;

/// On-the-wire format of a trip-record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Parquet,
    Csv,
}

impl FileFormat {
    /// Decode raw file bytes into a table.
    pub fn decode(self, bytes: Vec<u8>) -> Result<DataFrame, FetchError> {
        let decoded = match self {
            FileFormat::Parquet => ParquetReader::new(Cursor::new(bytes)).finish(),
            // Inference scans every row; legacy integer columns can gain
            // decimals late in a month.
            FileFormat::Csv => CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(None)
                .into_reader_with_file_handle(Cursor::new(bytes))
                .finish(),
        };

        decoded.map_err(|e| FetchError::Decode {
            format: self,
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Parquet => f.write_str("parquet"),
            FileFormat::Csv => f.write_str("csv"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("{format} decode failed: {reason}")]
    Decode { format: FileFormat, reason: String },
}

/// Byte source for trip-record files.
///
/// Implementations only move bytes; decoding and the fallback policy live in
/// [`Fetcher`].
pub trait TripSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Retrieve the full body at `url`.
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP(S) source. Relies on the client's default timeouts.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, IngestError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("tripload/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl TripSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let resp = self.client.get(url).send().map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().map_err(transport)?;
        Ok(body.to_vec())
    }
}

/// A successfully retrieved, non-empty file.
#[derive(Debug, Clone)]
pub struct Retrieved {
    pub table: DataFrame,
    pub format: FileFormat,
    /// Address the table was actually read from.
    pub url: String,
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Retrieved(Retrieved),
    Unavailable,
}

impl FetchOutcome {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchOutcome::Unavailable)
    }
}

pub struct Fetcher<'a> {
    source: &'a dyn TripSource,
    observer: &'a dyn IngestObserver,
}

impl<'a> Fetcher<'a> {
    pub fn new(source: &'a dyn TripSource, observer: &'a dyn IngestObserver) -> Self {
        Self { source, observer }
    }

    /// Fetch the Parquet file at `url`, falling back to its CSV sibling.
    pub fn fetch(&self, url: &str) -> FetchOutcome {
        let retrieved = match self.attempt(url, FileFormat::Parquet) {
            Ok(table) => Retrieved {
                table,
                format: FileFormat::Parquet,
                url: url.to_string(),
            },
            Err(primary_err) => {
                let fallback = fallback_address(url);
                self.observer.on_fallback(url, &fallback, &primary_err);
                match self.attempt(&fallback, FileFormat::Csv) {
                    Ok(table) => Retrieved {
                        table,
                        format: FileFormat::Csv,
                        url: fallback,
                    },
                    Err(fallback_err) => {
                        self.observer.on_unavailable(&fallback, &fallback_err);
                        return FetchOutcome::Unavailable;
                    }
                }
            }
        };

        if retrieved.table.height() == 0 {
            self.observer.on_empty(&retrieved.url);
            return FetchOutcome::Unavailable;
        }

        FetchOutcome::Retrieved(retrieved)
    }

    fn attempt(&self, url: &str, format: FileFormat) -> Result<DataFrame, FetchError> {
        let bytes = self.source.get(url)?;
        format.decode(bytes)
    }
}
