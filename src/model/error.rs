//! Error types for bookdl.
//!
//! Every failure in a session is recoverable except terminal setup:
//!
//! - [`SearchError`] - the search failed; shown as a status message, rows kept
//! - [`TransferError`] - a download failed; the originating row becomes `Failed`
//! - [`ResolutionError`] - no download link can be built for a record; the row
//!   is displayed as `Failed` and refuses the download trigger
//!
//! Terminal and runtime failures surface as [`crate::view::TuiError`] and end
//! the process with a non-zero status.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a catalog search.
///
/// The controller reports these as a transient status message and leaves the
/// query text and current rows untouched so the user can retry immediately.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Connection, DNS, TLS or timeout failure talking to the catalog.
    #[error("network error searching {url}: {source}")]
    Network {
        /// Search page URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The catalog answered with a non-success status.
    #[error("catalog returned HTTP {status} for {url}")]
    HttpStatus {
        /// Search page URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response contained no recognizable result rows.
    #[error("no results found")]
    NoResults,

    /// Results were found but none survived the display window.
    #[error("{found} results found, none left to display after skipping the first {skipped}")]
    NoUsableRows {
        /// Records returned by the provider.
        found: usize,
        /// Leading records skipped by policy.
        skipped: usize,
    },

    /// The search task ended without producing an outcome.
    #[error("search task aborted: {0}")]
    Aborted(String),
}

impl SearchError {
    pub(crate) fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }
}

/// Failure of a background byte transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Connection or stream failure.
    #[error("network error downloading {url}: {source}")]
    Network {
        /// Download URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// Download URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Creating, writing or renaming the destination failed.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    pub(crate) fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A download link cannot be built for a record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// Only 4- and 5-digit numeric identifiers have a known shard layout.
    #[error("unsupported catalog identifier {0:?}")]
    UnsupportedIdentifier(String),

    /// The record carries no checksum.
    #[error("record has no checksum")]
    MissingChecksum,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_usable_rows_message_mentions_counts() {
        let err = SearchError::NoUsableRows {
            found: 2,
            skipped: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('2'), "message should include found count: {msg}");
        assert!(msg.contains('3'), "message should include skip count: {msg}");
    }

    #[test]
    fn http_status_transfer_error_mentions_status() {
        let err = TransferError::HttpStatus {
            url: "http://x/y".to_string(),
            status: 500,
        };
        assert_eq!(err.to_string(), "HTTP 500 downloading http://x/y");
    }

    #[test]
    fn unsupported_identifier_displays_identifier() {
        let err = ResolutionError::UnsupportedIdentifier("123".to_string());
        assert!(err.to_string().contains("\"123\""));
    }
}
