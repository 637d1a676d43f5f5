//! Error types for the update decision engine.
//!
//! Parse failures on a candidate image are surfaced; parse failures on
//! container images are swallowed by the engine (the container is skipped).
//! Policy and pattern errors surface at configuration time, never during a
//! decision.

use thiserror::Error;

/// Error type for engine operations
#[derive(Error, Debug)]
pub enum Error {
    /// Image reference string could not be parsed
    #[error("malformed image reference: {0}")]
    MalformedReference(String),

    /// Policy label does not match any known policy variant
    #[error("unknown policy: {0}")]
    UnknownPolicy(String),

    /// Workload kind has no adapter
    #[error("unsupported workload kind: {0}")]
    UnsupportedKind(String),

    /// Glob pattern in a `glob:` policy failed to compile
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(#[from] glob::PatternError),

    /// Regular expression in a `regexp:` policy failed to compile
    #[error("invalid regular expression: {0}")]
    InvalidRegexp(#[from] regex::Error),

    /// Serialization error while converting a dynamic object
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error should surface at configuration time rather
    /// than while evaluating a candidate.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownPolicy(_) | Error::InvalidGlob(_) | Error::InvalidRegexp(_)
        )
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;
