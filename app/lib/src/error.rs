//! Error types for dialect detection.

use thiserror::Error;

/// Errors produced while detecting or validating a dialect.
#[derive(Debug, Error)]
pub enum DialectError {
    /// The sample does not hold enough non-blank lines for statistical detection.
    #[error("data sample too short: found {found} non-blank lines, at least {required} are required")]
    DataSampleTooShort {
        /// Non-blank lines found in the sample.
        found: usize,
        /// Non-blank lines required.
        required: usize,
    },

    /// Neither pattern matching nor frequency analysis produced a delimiter.
    #[error("unable to determine the sample's dialect: {reason}")]
    CannotDetermineDialect {
        /// Why detection gave up.
        reason: String,
    },

    /// A dialect violates one of its invariants.
    #[error("invalid dialect: {0}")]
    InvalidDialect(String),

    /// A detector configuration value is out of range.
    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),

    /// A structural pattern could not be compiled.
    #[error("failed to build structural pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_too_short_message() {
        let err = DialectError::DataSampleTooShort { found: 3, required: 10 };
        assert_eq!(
            err.to_string(),
            "data sample too short: found 3 non-blank lines, at least 10 are required"
        );
    }

    #[test]
    fn test_pattern_error_conversion() {
        let regex_err = regex::Regex::new("(").unwrap_err();
        let err: DialectError = regex_err.into();
        assert!(matches!(err, DialectError::Pattern(_)));
    }
}
