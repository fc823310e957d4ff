//! Error handling and result types for BucketIndex operations.
//!
//! The three lookup failures (`EmptyIndex`, `TooSmall`, `NotFound`) are ordinary
//! control-flow signals rather than exceptional conditions. Range scans wrap them
//! with the bound that failed to resolve, and the classification helpers look
//! through that wrapping.

use std::fmt;
use thiserror::Error;

/// Boxed error produced by a caller-supplied range callback.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which end of a range scan an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Start => write!(f, "start"),
            RangeBound::End => write!(f, "end"),
        }
    }
}

/// Error type for bucket index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index holds no buckets.
    #[error("index is empty")]
    EmptyIndex,
    /// The probe key is smaller than every stored key.
    #[error("key is smaller than every indexed key")]
    TooSmall,
    /// The probe key falls outside every bucket or is absent from its bucket.
    #[error("record not found")]
    NotFound,
    /// A range bound could not be placed in any bucket.
    #[error("locating {bound}: {source}")]
    Locate {
        bound: RangeBound,
        #[source]
        source: Box<IndexError>,
    },
    /// The range callback failed and aborted the scan.
    #[error("callback failure: {0}")]
    Callback(#[source] CallbackError),
    /// The split threshold is outside the supported range.
    #[error("threshold {threshold} is invalid (allowed range: {minimum}..={maximum})")]
    InvalidThreshold {
        threshold: u64,
        minimum: u64,
        maximum: u64,
    },
    /// An internal invariant of the index does not hold.
    #[error("corrupted index: {0}")]
    CorruptedIndex(String),
}

impl IndexError {
    /// Create a CorruptedIndex error with context.
    pub fn corrupted(component: &str, details: &str) -> Self {
        Self::CorruptedIndex(format!("{}: {}", component, details))
    }

    /// Wrap a callback failure.
    pub fn callback<E>(error: E) -> Self
    where
        E: Into<CallbackError>,
    {
        Self::Callback(error.into())
    }

    /// The innermost lookup error, skipping any range-bound wrapping.
    pub fn root(&self) -> &IndexError {
        match self {
            IndexError::Locate { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error (or the error it wraps) is `EmptyIndex`.
    pub fn is_empty_index(&self) -> bool {
        matches!(self.root(), IndexError::EmptyIndex)
    }

    /// Check if this error (or the error it wraps) is `TooSmall`.
    pub fn is_too_small(&self) -> bool {
        matches!(self.root(), IndexError::TooSmall)
    }

    /// Check if this error (or the error it wraps) is `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), IndexError::NotFound)
    }

    /// Check if this error came from a range callback.
    pub fn is_callback_error(&self) -> bool {
        matches!(self, IndexError::Callback(_))
    }
}

/// Public result type for index operations that may fail.
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type for index construction.
pub type InitResult<T> = Result<T, IndexError>;

/// Result extension trait for attaching range context.
pub trait IndexResultExt<T> {
    /// Wrap an error as a failure to locate the given range bound.
    fn while_locating(self, bound: RangeBound) -> IndexResult<T>;
}

impl<T> IndexResultExt<T> for Result<T, IndexError> {
    fn while_locating(self, bound: RangeBound) -> IndexResult<T> {
        self.map_err(|e| IndexError::Locate {
            bound,
            source: Box::new(e),
        })
    }
}
