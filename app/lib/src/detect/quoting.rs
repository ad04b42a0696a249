//! Quoting style classification.
//!
//! Re-reads the sample with a provisional dialect and compares, line by line,
//! the quote characters in the raw text with those that survived tokenizing
//! as data. Each line votes for a style and the most voted style wins.

use log::debug;

use crate::config::DetectorConfig;
use crate::dialect::{Dialect, QuotingStyle, Record, SampleReader};

/// Quote statistics of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineQuoting {
    /// Quote characters in the raw line.
    pub raw_quotes: usize,
    /// Quote characters inside the parsed field values.
    pub embedded_quotes: usize,
    /// Number of parsed fields.
    pub columns: usize,
    /// Number of fields containing a non-digit character.
    pub non_numeric: usize,
}

impl LineQuoting {
    pub fn measure(quote: char, record: &Record<'_>) -> Self {
        let count_quotes = |s: &str| s.chars().filter(|&c| c == quote).count();
        Self {
            raw_quotes: count_quotes(record.raw),
            embedded_quotes: record.fields.iter().map(|f| count_quotes(f.as_str())).sum(),
            columns: record.fields.len(),
            non_numeric: record
                .fields
                .iter()
                .filter(|f| f.chars().any(|c| !c.is_ascii_digit()))
                .count(),
        }
    }

    pub fn style(&self) -> QuotingStyle {
        if self.raw_quotes == 0 || self.raw_quotes <= self.embedded_quotes {
            QuotingStyle::None
        } else if self.raw_quotes >= 2 * self.columns {
            QuotingStyle::All
        } else if 2 * self.non_numeric == self.raw_quotes - self.embedded_quotes {
            QuotingStyle::NonNumeric
        } else {
            QuotingStyle::Minimal
        }
    }
}

/// Votes on the quoting style of a sample.
#[derive(Debug, Clone)]
pub struct QuotingStyleClassifier {
    sample_lines: usize,
}

impl QuotingStyleClassifier {
    /// Create a classifier from the detector configuration.
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            sample_lines: config.quoting_sample_lines,
        }
    }

    /// Classify the quoting style of `sample` as read with `dialect`.
    ///
    /// Ties between styles go to the style whose first vote came last, which
    /// keeps the outcome deterministic for a given sample. A dialect without a
    /// quote character is always [`QuotingStyle::None`].
    pub fn classify(&self, sample: &str, dialect: &Dialect) -> QuotingStyle {
        let Some(quote) = dialect.quote_char else {
            return QuotingStyle::None;
        };

        let mut votes: Vec<(QuotingStyle, usize)> = Vec::new();
        let records = SampleReader::new(sample, dialect)
            .filter(|record| !record.raw.is_empty())
            .take(self.sample_lines);

        for record in records {
            let style = LineQuoting::measure(quote, &record).style();
            match votes.iter_mut().find(|(s, _)| *s == style) {
                Some((_, count)) => *count += 1,
                None => votes.push((style, 1)),
            }
        }
        debug!("quoting style votes: {:?}", votes);

        // max_by_key keeps the last of equal maxima.
        votes
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(style, _)| style)
            .unwrap_or(QuotingStyle::None)
    }
}

impl Default for QuotingStyleClassifier {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}
