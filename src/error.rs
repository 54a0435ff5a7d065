//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Callers that need to branch on the failure kind can
//! downcast to [`Glicko2Error`].

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Glicko2Error {
    #[error("Invalid match outcome: {reason}")]
    InvalidOutcome { reason: String },

    #[error("Degenerate rating input: {reason}")]
    DegenerateInput { reason: String },

    #[error("Volatility solver did not converge after {iterations} iterations: {reason}")]
    Convergence { reason: String, iterations: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Glicko2Error {
    /// Extract the typed error from an `anyhow::Error`, if it is one of ours
    pub fn from_anyhow(err: &anyhow::Error) -> Option<&Glicko2Error> {
        err.downcast_ref::<Glicko2Error>()
    }
}
