//! Header row classification.
//!
//! Compares the first row against the rows that follow it. A column whose
//! data values all share one type and one length says a lot about the first
//! row: if the first row's value looks the same, it is probably data; if it
//! differs, it is probably a header.

use log::debug;

use crate::config::DetectorConfig;
use crate::dialect::{Dialect, SampleReader};

/// Coarse type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Only ASCII digits.
    Integer,
    /// A decimal number such as `3.14`, `-2` or `1e5`.
    Double,
    /// Anything else, including the empty string.
    String,
}

impl ValueType {
    /// Classify a field value.
    pub fn of(value: &str) -> Self {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            ValueType::Integer
        } else if is_decimal(value) {
            ValueType::Double
        } else {
            ValueType::String
        }
    }
}

fn is_decimal(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
        && value.parse::<f64>().is_ok()
}

/// Guesses whether the first row of a sample is a header.
#[derive(Debug, Clone)]
pub struct HeaderClassifier {
    min_rows: usize,
    sample_rows: usize,
}

impl HeaderClassifier {
    /// Create a classifier from the detector configuration.
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            min_rows: config.min_header_rows,
            sample_rows: config.header_sample_rows,
        }
    }

    /// Whether the first row of `sample`, read with `dialect`, looks like a header.
    ///
    /// Samples with fewer rows than the configured minimum are reported as
    /// having no header.
    pub fn has_header(&self, sample: &str, dialect: &Dialect) -> bool {
        let mut reader = SampleReader::new(sample, dialect);
        let total_rows = reader.record_count();
        if total_rows < self.min_rows {
            debug!("header check skipped: {} rows", total_rows);
            return false;
        }

        let Some(header) = reader.advance() else {
            return false;
        };
        let rows: Vec<Vec<String>> = reader
            .take(self.sample_rows)
            .map(|record| record.fields)
            .collect();

        let score: i32 = header
            .fields
            .iter()
            .enumerate()
            .map(|(column, value)| column_vote(value, rows.iter().filter_map(|row| row.get(column))))
            .sum();
        debug!("header score {} over {} rows", score, rows.len());

        score > 0
    }
}

impl Default for HeaderClassifier {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}

/// Vote of one column: +1 for a header, -1 against, 0 when the column is not uniform.
fn column_vote<'a>(header: &str, values: impl Iterator<Item = &'a String>) -> i32 {
    let mut profile: Option<(ValueType, usize)> = None;
    for value in values {
        let current = (ValueType::of(value), value.chars().count());
        match profile {
            None => profile = Some(current),
            Some(seen) if seen == current => {}
            Some(_) => return 0,
        }
    }

    let Some((value_type, length)) = profile else {
        return 0;
    };
    if value_type != ValueType::of(header) {
        1
    } else if length == header.chars().count() {
        -1
    } else {
        1
    }
}
