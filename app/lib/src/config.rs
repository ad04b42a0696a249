//! Detector configuration.
//!
//! The thresholds used by the statistical stages are empirical. They are kept
//! as named, overridable values instead of being baked into the algorithms.

use serde::{Deserialize, Serialize};

use crate::error::{DialectError, Result};

/// Tunable thresholds for [`DialectDetector`](crate::DialectDetector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum number of non-blank lines a sample must contain.
    pub min_sample_lines: usize,

    /// Fraction of non-blank lines a delimiter candidate must appear on.
    pub min_line_presence: f64,

    /// Largest population standard deviation of per-line counts a delimiter
    /// candidate may show.
    pub max_frequency_deviation: f64,

    /// Number of non-blank lines inspected when voting on a quoting style.
    pub quoting_sample_lines: usize,

    /// Number of rows after the candidate header inspected by header detection.
    pub header_sample_rows: usize,

    /// Minimum number of rows needed before header detection gives a verdict.
    pub min_header_rows: usize,
}

impl DetectorConfig {
    /// Set the minimum number of non-blank sample lines.
    pub fn with_min_sample_lines(mut self, lines: usize) -> Self {
        self.min_sample_lines = lines;
        self
    }

    /// Set the required per-line presence ratio for delimiter candidates.
    pub fn with_min_line_presence(mut self, ratio: f64) -> Self {
        self.min_line_presence = ratio;
        self
    }

    /// Set the maximum tolerated frequency deviation for delimiter candidates.
    pub fn with_max_frequency_deviation(mut self, deviation: f64) -> Self {
        self.max_frequency_deviation = deviation;
        self
    }

    /// Set how many lines take part in the quoting style vote.
    pub fn with_quoting_sample_lines(mut self, lines: usize) -> Self {
        self.quoting_sample_lines = lines;
        self
    }

    /// Set how many rows header detection compares against the header.
    pub fn with_header_sample_rows(mut self, rows: usize) -> Self {
        self.header_sample_rows = rows;
        self
    }

    /// Set how many rows a sample needs before header detection gives a verdict.
    pub fn with_min_header_rows(mut self, rows: usize) -> Self {
        self.min_header_rows = rows;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.min_sample_lines == 0 {
            return Err(DialectError::InvalidConfig(
                "min_sample_lines must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_line_presence) {
            return Err(DialectError::InvalidConfig(format!(
                "min_line_presence must be within 0.0..=1.0, got {}",
                self.min_line_presence
            )));
        }
        if !self.max_frequency_deviation.is_finite() || self.max_frequency_deviation < 0.0 {
            return Err(DialectError::InvalidConfig(format!(
                "max_frequency_deviation must be a non-negative number, got {}",
                self.max_frequency_deviation
            )));
        }
        if self.quoting_sample_lines == 0 {
            return Err(DialectError::InvalidConfig(
                "quoting_sample_lines must be at least 1".to_string(),
            ));
        }
        if self.min_header_rows < 2 {
            return Err(DialectError::InvalidConfig(
                "min_header_rows must be at least 2 (a header and one data row)".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_sample_lines: 10,
            min_line_presence: 0.98,
            max_frequency_deviation: 0.5,
            quoting_sample_lines: 15,
            header_sample_rows: 20,
            min_header_rows: 3,
        }
    }
}
