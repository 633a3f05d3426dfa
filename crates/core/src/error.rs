//! Unified error types for groupie.
//!
//! Every variant carries owned data so an error can be cloned and handed to
//! all callers waiting on the same shared refresh.

use std::fmt;

use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde::Serialize;

/// One of the four upstream datasets that make up a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Artists,
    Locations,
    Dates,
    Relations,
}

impl Dataset {
    pub const ALL: [Dataset; 4] = [Dataset::Artists, Dataset::Locations, Dataset::Dates, Dataset::Relations];

    pub fn as_str(self) -> &'static str {
        match self {
            Dataset::Artists => "artists",
            Dataset::Locations => "locations",
            Dataset::Dates => "dates",
            Dataset::Relations => "relations",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single upstream fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    /// The source answered with something other than 200 OK.
    #[error("received status {0}")]
    Status(u16),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection or protocol level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The body was not the expected JSON shape.
    #[error("malformed payload: {0}")]
    Decode(String),
}

/// A failed fetch, tagged with the dataset it was for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{dataset}: {reason}")]
pub struct SourceFailure {
    pub dataset: Dataset,
    pub reason: FetchFailure,
}

/// Unified error types for groupie.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// One or more upstream sources failed during a refresh.
    ///
    /// Holds every failed source, not only the first one observed.
    #[error("UPSTREAM_FETCH: {}", describe_failures(.0))]
    UpstreamFetch(Vec<SourceFailure>),

    /// Filter parameters were rejected before querying.
    #[error("INVALID_FILTER: {0}")]
    InvalidFilter(String),

    /// No artist exists with the requested id.
    #[error("NOT_FOUND: no artist with id {0}")]
    NotFound(u32),

    /// The shared refresh ended without publishing a result.
    #[error("REFRESH_ABORTED: {0}")]
    RefreshAborted(String),

    /// Invalid input parameters at the tool boundary.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),
}

fn describe_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Datasets that failed, if this is an upstream fetch error.
    pub fn failed_datasets(&self) -> Vec<Dataset> {
        match self {
            Error::UpstreamFetch(failures) => failures.iter().map(|f| f.dataset).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidFilter(_) | Error::InvalidInput(_) => -32602,
            Error::NotFound(_) => -32001,
            Error::UpstreamFetch(_) => -32008,
            Error::RefreshAborted(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound(42);
        assert!(err.to_string().contains("NOT_FOUND"));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_upstream_fetch_lists_every_source() {
        let err = Error::UpstreamFetch(vec![
            SourceFailure { dataset: Dataset::Dates, reason: FetchFailure::Status(502) },
            SourceFailure { dataset: Dataset::Relations, reason: FetchFailure::Timeout },
        ]);
        let message = err.to_string();
        assert!(message.starts_with("UPSTREAM_FETCH"));
        assert!(message.contains("dates: received status 502"));
        assert!(message.contains("relations: request timed out"));
        assert_eq!(err.failed_datasets(), vec![Dataset::Dates, Dataset::Relations]);
    }

    #[test]
    fn test_error_to_mcp_error() {
        let mcp_err: McpError = Error::NotFound(7).into();
        assert_eq!(mcp_err.code.0, -32001);

        let mcp_err: McpError = Error::InvalidFilter("min > max".into()).into();
        assert_eq!(mcp_err.code.0, -32602);
    }
}
