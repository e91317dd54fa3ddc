use thiserror::Error;

use trainplan_core::DomainError;

pub type EstimationResult<T> = Result<T, EstimationError>;

/// Errors surfaced by the estimation engine.
///
/// Sparse or missing history is *not* an error: absent statistics and empty
/// similarity results take the low-confidence fallback path instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    /// The caller's request is malformed; no partial skeleton is produced.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A data feed (project records / phase statistics) failed to answer.
    #[error("data feed failed: {0}")]
    Feed(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EstimationError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn feed(msg: impl Into<String>) -> Self {
        Self::Feed(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<DomainError> for EstimationError {
    fn from(value: DomainError) -> Self {
        Self::InvalidRequest(value.to_string())
    }
}
