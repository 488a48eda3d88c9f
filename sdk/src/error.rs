use std::fmt;

use shardline_api::v1::{Operation, error::ErrorCode};
use shardline_common::types::{ValidationError, ValidationErrors};

use crate::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{operation} failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: TransportError,
    },
    #[error("failed to encode {operation} request: {source}")]
    Marshal {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed {operation} response: {source}")]
    Unmarshal {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
    #[error("inconsistent {operation} response: {source}")]
    InvalidResponse {
        operation: Operation,
        #[source]
        source: ValidationError,
    },
    #[error("{operation} reported more results but returned an empty page")]
    StalledPagination { operation: Operation },
}

impl SdkError {
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.transport().map(|e| e.code)
    }

    pub fn is_retryable(&self) -> bool {
        self.transport().is_some_and(TransportError::is_retryable)
    }
}

/// A listing stopped by a failed page fetch.
///
/// `resume_after` is the cursor that was sent with the failed request; a new
/// paginator started from it continues exactly where this one stopped.
#[derive(Debug)]
pub struct PaginationAborted<C> {
    pub retrieved: usize,
    pub resume_after: Option<C>,
    pub source: SdkError,
}

impl<C: fmt::Debug> fmt::Display for PaginationAborted<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listing aborted after {} items", self.retrieved)?;
        if let Some(cursor) = &self.resume_after {
            write!(f, " (resume after {cursor:?})")?;
        }
        write!(f, ": {}", self.source)
    }
}

impl<C: fmt::Debug> std::error::Error for PaginationAborted<C> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Items gathered before a listing aborted, together with the abort.
#[derive(Debug)]
pub struct PartialListing<T, C> {
    pub items: Vec<T>,
    pub aborted: PaginationAborted<C>,
}

impl<T: fmt::Debug, C: fmt::Debug> fmt::Display for PartialListing<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.aborted, f)
    }
}

impl<T: fmt::Debug, C: fmt::Debug> std::error::Error for PartialListing<T, C> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.aborted.source)
    }
}
