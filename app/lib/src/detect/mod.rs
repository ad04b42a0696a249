//! Dialect detection.
//!
//! The pipeline runs in a fixed order:
//!
//! 1. line terminator from raw `\r`/`\n` counts
//! 2. quote and delimiter from quoted-field patterns
//! 3. delimiter from per-line character frequencies, when step 2 found none
//! 4. quoting style from a re-read of the sample with the provisional dialect
//!
//! Header detection runs on top of a finished dialect.

mod frequency;
mod header;
mod pattern;
mod quoting;
mod sample;
mod terminator;

pub use frequency::{is_frequency_candidate, FrequencyAnalyzer, ModalFrequencyAnalyzer};
pub use header::{HeaderClassifier, ValueType};
pub use pattern::{is_structural_delimiter, QuoteGuess, QuotePatternMatcher, StructuralPattern};
pub use quoting::QuotingStyleClassifier;
pub use sample::Sample;
pub use terminator::detect_line_terminator;

use log::debug;

use crate::config::DetectorConfig;
use crate::dialect::Dialect;
use crate::error::{DialectError, Result};

/// Quote character assumed when no quoted field was recognized.
pub const DEFAULT_QUOTE: char = '"';

/// A fallback strategy for finding the delimiter of a sample.
pub trait DelimiterHeuristic {
    /// Guess the delimiter of `sample`, never choosing `quote`.
    ///
    /// `Ok(None)` means no character qualified.
    fn guess_delimiter(&self, sample: &Sample<'_>, quote: Option<char>) -> Result<Option<char>>;
}

/// Infers dialects from text samples.
///
/// Detection is a pure function of the sample; a detector holds only its
/// configuration and can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct DialectDetector {
    config: DetectorConfig,
    patterns: QuotePatternMatcher,
    frequency: FrequencyAnalyzer,
    modal: ModalFrequencyAnalyzer,
    quoting: QuotingStyleClassifier,
    header: HeaderClassifier,
}

impl DialectDetector {
    /// Create a detector with the default configuration.
    ///
    /// # Errors
    ///
    /// [`DialectError::Pattern`] if the structural patterns fail to compile.
    pub fn new() -> Result<Self> {
        Self::with_config(DetectorConfig::default())
    }

    /// Create a detector with the given configuration.
    pub fn with_config(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            patterns: QuotePatternMatcher::new()?,
            frequency: FrequencyAnalyzer::new(&config),
            modal: ModalFrequencyAnalyzer::new(),
            quoting: QuotingStyleClassifier::new(&config),
            header: HeaderClassifier::new(&config),
            config,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Infer the full dialect of `sample`.
    ///
    /// # Errors
    ///
    /// [`DialectError::DataSampleTooShort`] if the sample has fewer non-blank
    /// lines than configured, [`DialectError::CannotDetermineDialect`] if no
    /// delimiter can be found.
    pub fn detect(&self, sample: &str) -> Result<Dialect> {
        let sample = Sample::new(sample);
        let line_count = sample.non_blank_count();
        if line_count < self.config.min_sample_lines {
            return Err(DialectError::DataSampleTooShort {
                found: line_count,
                required: self.config.min_sample_lines,
            });
        }

        let guess = self.patterns.guess(sample.text());
        match guess.pattern {
            Some(pattern) => debug!("quote {:?} found by {:?} pattern", guess.quote, pattern),
            None => debug!("no quoted fields, assuming {:?}", DEFAULT_QUOTE),
        }
        let quote = guess.quote.unwrap_or(DEFAULT_QUOTE);
        let delimiter = match guess.delimiter {
            Some(delimiter) => delimiter,
            None => self
                .frequency
                .guess_delimiter(&sample, Some(quote))?
                .ok_or_else(|| DialectError::CannotDetermineDialect {
                    reason: "no character is consistently present on every line".to_string(),
                })?,
        };

        let provisional = Dialect::new(delimiter)
            .with_quote_char(Some(quote))
            .with_line_terminator(sample.terminator());
        let quoting = self.quoting.classify(sample.text(), &provisional);

        let dialect = provisional.with_quoting(quoting);
        debug!(
            "detected dialect: delimiter={:?} quote={:?} terminator={} quoting={}",
            dialect.delimiter, quote, dialect.line_terminator, dialect.quoting
        );
        Ok(dialect)
    }

    /// Infer delimiter, quote and line terminator with the lighter sniffing
    /// heuristics.
    ///
    /// Unlike [`detect`](Self::detect) there is no minimum sample size, the
    /// quote stays `None` when no quoted field was recognized, and the quoting
    /// style is left at its default.
    pub fn sniff(&self, sample: &str) -> Result<Dialect> {
        let sample = Sample::new(sample);
        let guess = self.patterns.guess(sample.text());
        let delimiter = match guess.delimiter {
            Some(delimiter) => delimiter,
            None => self
                .modal
                .guess_delimiter(&sample, guess.quote)?
                .ok_or_else(|| DialectError::CannotDetermineDialect {
                    reason: "sample holds no delimiter candidates".to_string(),
                })?,
        };

        debug!(
            "sniffed delimiter={:?} quote={:?} pattern={:?}",
            delimiter, guess.quote, guess.pattern
        );
        Ok(Dialect::new(delimiter)
            .with_quote_char(guess.quote)
            .with_line_terminator(sample.terminator()))
    }

    /// Whether the first row of `sample` is likely a header.
    ///
    /// Runs [`detect`](Self::detect) first. A sample too short to detect is
    /// reported as having no header; other detection errors are returned.
    pub fn has_header(&self, sample: &str) -> Result<bool> {
        match self.detect(sample) {
            Ok(dialect) => Ok(self.has_header_with(sample, &dialect)),
            Err(DialectError::DataSampleTooShort { found, .. }) => {
                debug!("no header verdict for short sample ({} lines)", found);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether the first row of `sample`, read with `dialect`, is likely a header.
    pub fn has_header_with(&self, sample: &str, dialect: &Dialect) -> bool {
        self.header.has_header(sample, dialect)
    }
}
