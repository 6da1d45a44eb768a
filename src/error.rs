//! Error types for the normalization engine.

use thiserror::Error;

/// Result type alias using [`NormalizeError`].
pub type Result<T, E = NormalizeError> = std::result::Result<T, E>;

/// Failures surfaced by the engine.
///
/// Input problems (`InvalidDependency`, `InvalidAttribute`, `TooManyAttributes`) are
/// reported to the caller as-is. `InternalInvariantViolation` indicates a logic defect
/// and is fatal for the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// A dependency has an empty side or names an attribute outside the universe.
    #[error("invalid dependency `{dependency}`: {reason}")]
    InvalidDependency { dependency: String, reason: String },

    /// An attribute name is empty or repeated.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Subset enumeration was requested on a universe beyond the configured bound.
    #[error("too many attributes: {count} exceeds the limit of {limit}")]
    TooManyAttributes { count: usize, limit: usize },

    /// An iteration cap was exceeded.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl NormalizeError {
    pub fn invalid_dependency(dependency: impl ToString, reason: impl Into<String>) -> Self {
        NormalizeError::InvalidDependency {
            dependency: dependency.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_attribute(msg: impl Into<String>) -> Self {
        NormalizeError::InvalidAttribute(msg.into())
    }

    /// Build an internal-invariant error, logging it on the way out.
    pub fn invariant(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        error!("internal invariant violated: {}", msg);
        NormalizeError::InternalInvariantViolation(msg)
    }

    /// Whether the error stems from caller input rather than an engine defect.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, NormalizeError::InternalInvariantViolation(_))
    }
}
