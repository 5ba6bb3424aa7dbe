//! Error types shared across the screening pipeline.

use thiserror::Error;

/// Failure of an external data collaborator for a single symbol.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider call timed out after {0} ms")]
    Timeout(u64),

    #[error("no data for symbol {0}")]
    NotFound(String),

    #[error("malformed provider data: {0}")]
    Malformed(String),

    #[error("rate limited by provider")]
    RateLimited,
}

impl ProviderError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Unavailable(_) | ProviderError::Timeout(_) | ProviderError::RateLimited
        )
    }
}

/// A price series that violates the bar ordering or value invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index} is not after the previous bar")]
    NotAscending { index: usize },

    #[error("bar {index} has a non-positive or non-finite price")]
    InvalidPrice { index: usize },

    #[error("bar {index} has a negative or non-finite volume")]
    InvalidVolume { index: usize },
}

impl From<SeriesError> for ProviderError {
    fn from(err: SeriesError) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// Why the evaluator produced no result for a symbol.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("insufficient history: {bars} bars, {required} required")]
    InsufficientHistory { bars: usize, required: usize },

    #[error("RSI is undefined for the latest bar")]
    RsiUndefined,

    #[error("RSI {rsi:.2} outside [{min}, {max}]")]
    RsiOutOfRange { rsi: f64, min: f64, max: f64 },
}

/// Errors surfaced to the caller of a scan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("invalid scan request: {0}")]
    InvalidRequest(String),

    #[error("scan cancelled")]
    Cancelled,
}
