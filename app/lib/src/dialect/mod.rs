//! Dialect types.
//!
//! A [`Dialect`] describes one variant of delimited text: which character
//! separates fields, how fields are quoted and escaped, and how lines end.

mod reader;
mod tokenizer;

pub use reader::{Record, SampleReader};
pub use tokenizer::{tokenize, Tokenizer};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DialectError, Result};

/// How fields are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotingStyle {
    /// Fields are never quoted.
    None,
    /// Only fields that need it are quoted.
    Minimal,
    /// Every field is quoted.
    All,
    /// Every non-numeric field is quoted.
    NonNumeric,
}

impl QuotingStyle {
    /// Lowercase name of the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotingStyle::None => "none",
            QuotingStyle::Minimal => "minimal",
            QuotingStyle::All => "all",
            QuotingStyle::NonNumeric => "nonnumeric",
        }
    }
}

impl fmt::Display for QuotingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line terminator sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineTerminator {
    /// `\n`
    #[serde(rename = "\n")]
    Lf,
    /// `\r`
    #[serde(rename = "\r")]
    Cr,
    /// `\r\n`
    #[serde(rename = "\r\n")]
    CrLf,
}

impl LineTerminator {
    /// The terminator's character sequence.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::Lf => "\n",
            LineTerminator::Cr => "\r",
            LineTerminator::CrLf => "\r\n",
        }
    }

    /// Short printable name (`LF`, `CR`, `CRLF`).
    pub fn name(&self) -> &'static str {
        match self {
            LineTerminator::Lf => "LF",
            LineTerminator::Cr => "CR",
            LineTerminator::CrLf => "CRLF",
        }
    }
}

impl fmt::Display for LineTerminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Formatting parameters of one delimited-text variant.
///
/// Detection produces a dialect from a sample; callers may also build one by
/// hand, starting from [`Dialect::default`] and overriding fields with the
/// `with_*` methods. Tokenizing only ever borrows a dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialect {
    /// Field separator.
    pub delimiter: char,
    /// Quote character, `None` when quoting is not recognized.
    pub quote_char: Option<char>,
    /// Escape character placed before a literal quote inside a quoted field.
    pub escape_char: Option<char>,
    /// Line terminator.
    pub line_terminator: LineTerminator,
    /// Quoting style.
    pub quoting: QuotingStyle,
    /// Whether readers skip empty lines.
    pub skip_blank_lines: bool,
}

impl Dialect {
    /// Create the default dialect with a different delimiter.
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }

    /// Override the delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Override the quote character.
    pub fn with_quote_char(mut self, quote_char: Option<char>) -> Self {
        self.quote_char = quote_char;
        self
    }

    /// Override the escape character.
    pub fn with_escape_char(mut self, escape_char: Option<char>) -> Self {
        self.escape_char = escape_char;
        self
    }

    /// Override the line terminator.
    pub fn with_line_terminator(mut self, line_terminator: LineTerminator) -> Self {
        self.line_terminator = line_terminator;
        self
    }

    /// Override the quoting style.
    pub fn with_quoting(mut self, quoting: QuotingStyle) -> Self {
        self.quoting = quoting;
        self
    }

    /// Override the blank line policy.
    pub fn with_skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    /// Escape character that actually triggers unescaping: set and distinct
    /// from the quote character.
    pub fn active_escape(&self) -> Option<char> {
        self.escape_char.filter(|&escape| Some(escape) != self.quote_char)
    }

    /// Check the dialect invariants.
    pub fn validate(&self) -> Result<()> {
        if is_terminator_char(self.delimiter) {
            return Err(DialectError::InvalidDialect(format!(
                "delimiter {:?} is a line terminator character",
                self.delimiter
            )));
        }
        if let Some(quote) = self.quote_char {
            if quote == self.delimiter {
                return Err(DialectError::InvalidDialect(format!(
                    "delimiter and quote character are both {:?}",
                    quote
                )));
            }
            if is_terminator_char(quote) {
                return Err(DialectError::InvalidDialect(format!(
                    "quote character {:?} is a line terminator character",
                    quote
                )));
            }
        }
        if self.escape_char == Some(self.delimiter) {
            return Err(DialectError::InvalidDialect(format!(
                "delimiter and escape character are both {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_char: Some('"'),
            escape_char: None,
            line_terminator: LineTerminator::CrLf,
            quoting: QuotingStyle::Minimal,
            skip_blank_lines: true,
        }
    }
}

fn is_terminator_char(c: char) -> bool {
    c == '\r' || c == '\n'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dialect() {
        let dialect = Dialect::default();
        assert_eq!(dialect.delimiter, ',');
        assert_eq!(dialect.quote_char, Some('"'));
        assert_eq!(dialect.escape_char, None);
        assert_eq!(dialect.line_terminator, LineTerminator::CrLf);
        assert_eq!(dialect.quoting, QuotingStyle::Minimal);
        assert!(dialect.skip_blank_lines);
        assert!(dialect.validate().is_ok());
    }

    #[test]
    fn test_overrides_leave_original_untouched() {
        let base = Dialect::default();
        let custom = base
            .clone()
            .with_delimiter('?')
            .with_quote_char(Some('`'))
            .with_line_terminator(LineTerminator::Lf);

        assert_eq!(custom.delimiter, '?');
        assert_eq!(custom.quote_char, Some('`'));
        assert_eq!(custom.line_terminator.as_str(), "\n");
        assert_eq!(base.delimiter, ',');
    }

    #[test]
    fn test_delimiter_equal_to_quote_is_invalid() {
        let dialect = Dialect::new('"');
        assert!(matches!(dialect.validate(), Err(DialectError::InvalidDialect(_))));
    }

    #[test]
    fn test_terminator_delimiter_is_invalid() {
        let dialect = Dialect::new('\n');
        assert!(dialect.validate().is_err());
    }

    #[test]
    fn test_escape_equal_to_delimiter_is_invalid() {
        let dialect = Dialect::new(';').with_escape_char(Some(';'));
        assert!(dialect.validate().is_err());
    }

    #[test]
    fn test_active_escape() {
        let dialect = Dialect::default().with_escape_char(Some('\\'));
        assert_eq!(dialect.active_escape(), Some('\\'));

        let dialect = Dialect::default().with_escape_char(Some('"'));
        assert_eq!(dialect.active_escape(), None);

        assert_eq!(Dialect::default().active_escape(), None);
    }

    #[test]
    fn test_dialect_serializes_as_plain_record() {
        let dialect = Dialect::new('|').with_quoting(QuotingStyle::NonNumeric);
        let json = serde_json::to_value(&dialect).unwrap();

        assert_eq!(json["delimiter"], "|");
        assert_eq!(json["quote_char"], "\"");
        assert_eq!(json["escape_char"], serde_json::Value::Null);
        assert_eq!(json["line_terminator"], "\r\n");
        assert_eq!(json["quoting"], "nonnumeric");

        let back: Dialect = serde_json::from_value(json).unwrap();
        assert_eq!(back, dialect);
    }

    #[test]
    fn test_quoting_style_display() {
        assert_eq!(QuotingStyle::None.to_string(), "none");
        assert_eq!(QuotingStyle::NonNumeric.to_string(), "nonnumeric");
        assert_eq!(LineTerminator::CrLf.to_string(), "CRLF");
    }
}
