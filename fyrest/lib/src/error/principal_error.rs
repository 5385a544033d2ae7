//! Principal lookup errors.

use thiserror::Error;

/// Errors returned by a [`PrincipalLoader`](crate::PrincipalLoader).
///
/// The request context never retries or recovers from these; they travel
/// up to the dispatch layer, which answers with a 500.
#[derive(Debug, Error)]
pub enum PrincipalError {
    /// The backing session/user store could not be reached.
    #[error("Principal store unavailable: {0}")]
    Unavailable(String),

    /// The store answered but the stored principal could not be decoded.
    #[error("Invalid principal record: {0}")]
    Invalid(String),

    /// Any other failure raised by the loader.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl PrincipalError {
    /// Creates an [`PrincipalError::Unavailable`] error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}
