//! Error taxonomy for the matching pipeline.
//!
//! Internal plumbing returns [`anyhow::Result`]; at the engine boundary the
//! failure is classified into one of the variants below so callers can tell
//! a rejected request from a broken collaborator or a failed bootstrap.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaqError {
    /// The request was rejected before reaching the matcher (e.g. empty question).
    #[error("invalid request: {0}")]
    Validation(String),

    /// The scoring or classifier collaborator failed during a query.
    #[error("collaborator failed: {0:#}")]
    Collaborator(anyhow::Error),

    /// The FAQ index could not be built. The process must not serve traffic.
    #[error("bootstrap failed: {0:#}")]
    Bootstrap(anyhow::Error),

    /// The conversation log could not be appended.
    #[error("conversation log write failed: {0:#}")]
    Log(anyhow::Error),
}

impl FaqError {
    /// Whether the failure is the caller's fault rather than an internal one.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FaqError::Validation(_))
    }
}

pub type FaqResult<T> = std::result::Result<T, FaqError>;
