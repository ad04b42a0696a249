//! # CSV Dialect Detection Library
//!
//! Infers the structural format ("dialect") of delimited text from a raw
//! sample, without external metadata, and tokenizes lines according to it.
//!
//! Detection looks at the line terminator, quoted-field patterns, per-line
//! character frequencies and quote statistics to produce a [`Dialect`]; a
//! separate classifier guesses whether the first row is a header.
//!
//! ```
//! use csv_dialect::{detect, tokenize, QuotingStyle};
//!
//! let sample = "id|name|score\n".repeat(12);
//! let dialect = detect(&sample).unwrap();
//! assert_eq!(dialect.delimiter, '|');
//! assert_eq!(dialect.quoting, QuotingStyle::None);
//! assert_eq!(tokenize("1|ann|9", &dialect), vec!["1", "ann", "9"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod detect;
pub mod dialect;
pub mod error;

pub use config::DetectorConfig;
pub use detect::{DelimiterHeuristic, DialectDetector};
pub use dialect::{tokenize, Dialect, LineTerminator, QuotingStyle, Record, SampleReader, Tokenizer};
pub use error::{DialectError, Result};

/// Infer the dialect of `sample` with the default configuration.
///
/// See [`DialectDetector::detect`].
pub fn detect(sample: &str) -> Result<Dialect> {
    DialectDetector::new()?.detect(sample)
}

/// Infer delimiter and quote of `sample` with the lighter sniffing heuristics.
///
/// See [`DialectDetector::sniff`].
pub fn sniff(sample: &str) -> Result<Dialect> {
    DialectDetector::new()?.sniff(sample)
}

/// Whether the first row of `sample` is likely a header.
///
/// See [`DialectDetector::has_header`].
pub fn has_header(sample: &str) -> Result<bool> {
    DialectDetector::new()?.has_header(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_level_entry_points() {
        let sample = "a;b;c\n".repeat(10);
        assert_eq!(detect(&sample).unwrap().delimiter, ';');
        assert_eq!(sniff(&sample).unwrap().delimiter, ';');
        assert!(!has_header(&sample).unwrap());
    }
}
