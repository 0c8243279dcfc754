use std::fmt;

use thiserror::Error;

/// The remote call an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadInitial,
    Search,
    Filter,
    Recommendations,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoadInitial => "initial image load",
            Self::Search => "search",
            Self::Filter => "filter",
            Self::Recommendations => "recommendation",
        };
        f.write_str(name)
    }
}

/// A failed backend round trip. Network failures, non-2xx statuses and
/// malformed payloads are not told apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} request failed: {detail}")]
pub struct RequestError {
    pub operation: Operation,
    pub detail: String,
}

impl RequestError {
    pub fn new(operation: Operation, err: &anyhow::Error) -> Self {
        Self {
            operation,
            detail: format!("{err:#}"),
        }
    }
}
