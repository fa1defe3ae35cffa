//! Error types for the matching subsystem.

use thiserror::Error;

/// Matching subsystem error type.
///
/// Classifiers and scorers never fail; errors only come from configuration,
/// parsing of enumerated kinds, and pipeline construction.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A string that is not one of the sixteen MBTI codes.
    #[error("unknown MBTI type: {0}")]
    UnknownMbtiType(String),
    /// A string that is not a known matching scene.
    #[error("unknown scene: {0}")]
    UnknownScene(String),
    /// A string that does not name a variant of an enumerated kind.
    #[error("unknown {kind}: {value}")]
    UnknownKind {
        /// Name of the kind being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid built-in pattern.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Convenience result alias for matching operations.
pub type MatchResult<T> = Result<T, MatchError>;
