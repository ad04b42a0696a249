//! Sample text prepared for detection.

use crate::dialect::LineTerminator;

use super::terminator::detect_line_terminator;

/// A raw sample with its detected line terminator and trailing line breaks removed.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    text: &'a str,
    terminator: LineTerminator,
}

impl<'a> Sample<'a> {
    /// Detect the terminator of `raw` and trim its trailing line breaks.
    pub fn new(raw: &'a str) -> Self {
        Self::with_terminator(raw, detect_line_terminator(raw))
    }

    /// Wrap `raw` using an already known terminator.
    pub fn with_terminator(raw: &'a str, terminator: LineTerminator) -> Self {
        Self {
            text: raw.trim_end_matches(['\r', '\n']),
            terminator,
        }
    }

    /// Sample text without trailing line breaks.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The sample's line terminator.
    pub fn terminator(&self) -> LineTerminator {
        self.terminator
    }

    /// Physical lines split on the terminator.
    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        let text = self.text;
        let terminator = self.terminator.as_str();
        (!text.is_empty())
            .then(|| text.split(terminator))
            .into_iter()
            .flatten()
    }

    /// Physical lines that are not empty.
    pub fn non_blank_lines(&self) -> impl Iterator<Item = &'a str> {
        self.lines().filter(|line| !line.is_empty())
    }

    /// Number of non-empty lines.
    pub fn non_blank_count(&self) -> usize {
        self.non_blank_lines().count()
    }
}
