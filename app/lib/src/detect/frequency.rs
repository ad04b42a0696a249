//! Frequency-based delimiter guessing.
//!
//! Used when structural matching could not see a delimiter. A real delimiter
//! shows up on virtually every row, and about equally often on each.

use std::collections::BTreeMap;

use log::debug;

use crate::config::DetectorConfig;
use crate::error::{DialectError, Result};

use super::{DelimiterHeuristic, Sample};

/// Whether `c` may be considered a delimiter by frequency analysis.
///
/// Space-like characters, ASCII letters and digits, and line breaks are excluded.
pub fn is_frequency_candidate(c: char) -> bool {
    !(matches!(c, ' ' | '\u{1e}' | '\u{a0}' | '\r' | '\n') || c.is_ascii_alphanumeric())
}

/// Per-line occurrence counts of every candidate character, over the lines
/// the character occurs on.
fn line_frequencies(sample: &Sample<'_>, quote: Option<char>) -> BTreeMap<char, Vec<usize>> {
    let mut frequencies: BTreeMap<char, Vec<usize>> = BTreeMap::new();

    for line in sample.non_blank_lines() {
        let mut counts: BTreeMap<char, usize> = BTreeMap::new();
        for c in line
            .chars()
            .filter(|&c| Some(c) != quote && is_frequency_candidate(c))
        {
            *counts.entry(c).or_default() += 1;
        }
        for (c, count) in counts {
            frequencies.entry(c).or_default().push(count);
        }
    }

    frequencies
}

/// Mean and population standard deviation.
fn mean_and_deviation(values: &[usize]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

/// Picks the delimiter whose per-line frequency is present and stable.
///
/// Candidates must appear on at least `min_line_presence` of the non-blank
/// lines and their per-line counts may not deviate by more than
/// `max_frequency_deviation`. Of the survivors the one with the highest mean
/// count wins, ties going to the highest character code.
#[derive(Debug, Clone)]
pub struct FrequencyAnalyzer {
    min_lines: usize,
    min_presence: f64,
    max_deviation: f64,
}

impl FrequencyAnalyzer {
    /// Create an analyzer from the detector configuration.
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            min_lines: config.min_sample_lines,
            min_presence: config.min_line_presence,
            max_deviation: config.max_frequency_deviation,
        }
    }
}

impl Default for FrequencyAnalyzer {
    fn default() -> Self {
        Self::new(&DetectorConfig::default())
    }
}

impl DelimiterHeuristic for FrequencyAnalyzer {
    fn guess_delimiter(&self, sample: &Sample<'_>, quote: Option<char>) -> Result<Option<char>> {
        let line_count = sample.non_blank_count();
        if line_count < self.min_lines {
            return Err(DialectError::DataSampleTooShort {
                found: line_count,
                required: self.min_lines,
            });
        }

        let required_presence = self.min_presence * line_count as f64;
        let best = line_frequencies(sample, quote)
            .into_iter()
            .filter(|(_, counts)| counts.len() as f64 >= required_presence)
            .filter_map(|(c, counts)| {
                let (mean, deviation) = mean_and_deviation(&counts);
                if deviation > self.max_deviation {
                    debug!("dropping delimiter candidate {:?}: deviation {:.3}", c, deviation);
                    return None;
                }
                debug!("delimiter candidate {:?}: mean {:.3}, deviation {:.3}", c, mean, deviation);
                Some((c, mean))
            })
            .max_by(|(c_a, mean_a), (c_b, mean_b)| mean_a.total_cmp(mean_b).then(c_a.cmp(c_b)));

        Ok(best.map(|(c, _)| c))
    }
}

/// Picks the delimiter that most often occurs its modal number of times.
///
/// For each candidate the largest per-line count is taken as its mode; the
/// score is the number of non-blank lines where it occurs exactly that often.
/// The highest score wins, ties going to the highest character code. There is
/// no minimum sample size.
#[derive(Debug, Clone, Default)]
pub struct ModalFrequencyAnalyzer;

impl ModalFrequencyAnalyzer {
    /// Create a new analyzer.
    pub fn new() -> Self {
        Self
    }
}

impl DelimiterHeuristic for ModalFrequencyAnalyzer {
    fn guess_delimiter(&self, sample: &Sample<'_>, quote: Option<char>) -> Result<Option<char>> {
        let best = line_frequencies(sample, quote)
            .into_iter()
            .map(|(c, counts)| {
                let mode = counts.iter().copied().max().unwrap_or(0);
                let score = counts.iter().filter(|&&count| count == mode).count();
                (c, score)
            })
            .max_by(|(c_a, score_a), (c_b, score_b)| score_a.cmp(score_b).then(c_a.cmp(c_b)));

        if let Some((c, score)) = best {
            debug!("modal delimiter {:?} scored {}", c, score);
        }
        Ok(best.map(|(c, _)| c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(line: &str, n: usize) -> String {
        vec![line; n].join("\n")
    }

    fn analyze(text: &str) -> Result<Option<char>> {
        FrequencyAnalyzer::default().guess_delimiter(&Sample::new(text), Some('"'))
    }

    #[test]
    fn test_pipe_delimiter() {
        let text = lines("alpha|beta|gamma", 12);
        assert_eq!(analyze(&text).unwrap(), Some('|'));
    }

    #[test]
    fn test_too_few_lines() {
        let text = lines("a|b", 9);
        assert!(matches!(
            analyze(&text),
            Err(DialectError::DataSampleTooShort { found: 9, required: 10 })
        ));
    }

    #[test]
    fn test_blank_lines_do_not_count() {
        let text = lines("a|b\n", 9);
        assert!(matches!(analyze(&text), Err(DialectError::DataSampleTooShort { found: 9, .. })));
    }

    #[test]
    fn test_no_candidates() {
        let text = lines("just some words", 12);
        assert_eq!(analyze(&text).unwrap(), None);
    }

    #[test]
    fn test_candidate_missing_from_lines_is_dropped() {
        let mut rows = vec!["a;b,c"; 11];
        rows.push("a;b c");
        let text = rows.join("\n");
        assert_eq!(analyze(&text).unwrap(), Some(';'));
    }

    #[test]
    fn test_unstable_candidate_is_dropped() {
        let rows: Vec<&str> = (0..12)
            .map(|i| if i % 2 == 0 { "a;b,c" } else { "a;b,c,d,e" })
            .collect();
        let text = rows.join("\n");
        assert_eq!(analyze(&text).unwrap(), Some(';'));
    }

    fn rows_with_candidate(total: usize, with_candidate: usize) -> String {
        (0..total)
            .map(|i| if i < with_candidate { "a;b" } else { "a b" })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn alternating_counts(lines: usize) -> String {
        (0..lines)
            .map(|i| if i % 2 == 0 { "a;b" } else { "a;b;c" })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_presence_at_cutoff_is_kept() {
        assert_eq!(analyze(&rows_with_candidate(50, 49)).unwrap(), Some(';'));
    }

    #[test]
    fn test_presence_below_cutoff_is_dropped() {
        assert_eq!(analyze(&rows_with_candidate(50, 48)).unwrap(), None);
    }

    #[test]
    fn test_deviation_at_limit_is_kept() {
        let text = alternating_counts(12);
        assert_eq!(mean_and_deviation(&[1, 2, 1, 2]).1, 0.5);
        assert_eq!(analyze(&text).unwrap(), Some(';'));
    }

    #[test]
    fn test_deviation_past_limit_is_dropped() {
        let text = alternating_counts(12);
        let config = DetectorConfig::default().with_max_frequency_deviation(0.499);
        let guess = FrequencyAnalyzer::new(&config)
            .guess_delimiter(&Sample::new(&text), Some('"'))
            .unwrap();
        assert_eq!(guess, None);
    }

    #[test]
    fn test_highest_mean_wins() {
        let text = lines("a;b;c;d,e", 12);
        assert_eq!(analyze(&text).unwrap(), Some(';'));
    }

    #[test]
    fn test_tie_goes_to_highest_character_code() {
        let text = lines("a,b;c", 12);
        assert_eq!(analyze(&text).unwrap(), Some(';'));
    }

    #[test]
    fn test_quote_is_never_a_candidate() {
        let text = lines("\"a\"\t\"b\"", 12);
        assert_eq!(analyze(&text).unwrap(), Some('\t'));
    }

    #[test]
    fn test_modal_analyzer() {
        let text = "a:b,c\nd:e\nf:g,h,i\nj:k";
        let guess = ModalFrequencyAnalyzer::new()
            .guess_delimiter(&Sample::new(text), None)
            .unwrap();
        assert_eq!(guess, Some(':'));
    }

    #[test]
    fn test_modal_analyzer_without_candidates() {
        let guess = ModalFrequencyAnalyzer::new()
            .guess_delimiter(&Sample::new("abc\ndef"), None)
            .unwrap();
        assert_eq!(guess, None);
    }

    #[test]
    fn test_mean_and_deviation() {
        let (mean, deviation) = mean_and_deviation(&[1, 3]);
        assert_eq!(mean, 2.0);
        assert_eq!(deviation, 1.0);
        assert_eq!(mean_and_deviation(&[]), (0.0, 0.0));
    }
}
