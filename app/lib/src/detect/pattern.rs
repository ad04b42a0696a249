//! Structural quote/delimiter matching.
//!
//! Looks for quoted fields and reads the quote character and the delimiter
//! straight off their surroundings, e.g. `,"text",` or a quoted field that
//! opens a line and is followed by a delimiter. Samples without quoted fields
//! yield no guess here and fall through to frequency analysis.

use std::collections::HashMap;
use std::hash::Hash;

use log::debug;
use regex::Regex;

use crate::error::Result;

/// A quoted field with lazy content that never crosses a line break.
const QUOTED_FIELD: &str = r#"(?:"[^\r\n]*?"|'[^\r\n]*?')"#;

/// The characters accepted by [`is_structural_delimiter`], as a regex class.
const DELIMITER: &str = r#"[^\p{Alphabetic}\p{N}_ \x{1E}\x{A0}\r\n"']"#;

/// Whether `c` may act as a delimiter in a structural pattern.
///
/// Letters, digits, underscore, space-like characters (space, record
/// separator, no-break space), line breaks and quote characters are excluded.
pub fn is_structural_delimiter(c: char) -> bool {
    !(c.is_alphanumeric()
        || matches!(c, '_' | ' ' | '\u{1e}' | '\u{a0}' | '\r' | '\n' | '"' | '\''))
}

/// The structural patterns, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralPattern {
    /// `,"text",` - a quoted field flanked by the same delimiter on both sides.
    Interior,
    /// `"text",` - a quoted field opening a line, followed by a delimiter.
    Leading,
    /// `,"text"` - a quoted field closing a line, preceded by a delimiter.
    Trailing,
    /// `"text"` - a whole line made of one quoted field.
    WholeLine,
}

impl StructuralPattern {
    /// Patterns in priority order.
    pub const PRIORITY: [StructuralPattern; 4] = [
        StructuralPattern::Interior,
        StructuralPattern::Leading,
        StructuralPattern::Trailing,
        StructuralPattern::WholeLine,
    ];

    /// Read the quote and delimiter out of one match.
    fn capture(self, matched: &str) -> Option<(char, Option<char>)> {
        let mut chars = matched.chars();
        match self {
            StructuralPattern::Interior | StructuralPattern::Trailing => {
                let delimiter = chars.next()?;
                let quote = chars.find(|&c| c != ' ')?;
                Some((quote, Some(delimiter)))
            }
            StructuralPattern::Leading => {
                let quote = chars.next()?;
                let delimiter = matched.strip_suffix(' ').unwrap_or(matched).chars().last()?;
                Some((quote, Some(delimiter)))
            }
            StructuralPattern::WholeLine => Some((chars.next()?, None)),
        }
    }
}

/// Outcome of structural matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuoteGuess {
    /// Most frequent quote character, if any pattern matched.
    pub quote: Option<char>,
    /// Most frequent delimiter, if the winning pattern captures one.
    pub delimiter: Option<char>,
    /// The pattern that produced the guess.
    pub pattern: Option<StructuralPattern>,
}

/// Finds the quote character and delimiter from quoted-field patterns.
///
/// The patterns are compiled once, independent of the samples they are run on.
#[derive(Debug, Clone)]
pub struct QuotePatternMatcher {
    interior_open: Regex,
    leading: Regex,
    trailing: Regex,
    whole_line: Regex,
}

impl QuotePatternMatcher {
    /// Compile the structural patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            interior_open: Regex::new(&format!(r#"{DELIMITER} ?["']"#))?,
            leading: Regex::new(&format!("(?mR)^{QUOTED_FIELD}{DELIMITER} ?"))?,
            trailing: Regex::new(&format!("(?mR){DELIMITER} ?{QUOTED_FIELD}$"))?,
            whole_line: Regex::new(&format!("(?mR)^{QUOTED_FIELD}$"))?,
        })
    }

    /// Guess the quote and delimiter of `text`.
    ///
    /// Patterns are tried in [`StructuralPattern::PRIORITY`] order and the
    /// first one with any match wins. Among its matches the most frequent
    /// quote and delimiter are chosen; ties go to the one seen first.
    pub fn guess(&self, text: &str) -> QuoteGuess {
        for pattern in StructuralPattern::PRIORITY {
            let captures = self.captures(pattern, text);
            if captures.is_empty() {
                continue;
            }

            let quote = most_frequent(captures.iter().map(|(quote, _)| *quote));
            let delimiter = quote.and_then(|_| most_frequent(captures.iter().filter_map(|(_, d)| *d)));
            debug!(
                "{} structural matches: quote={:?} delimiter={:?}",
                captures.len(),
                quote,
                delimiter
            );

            return QuoteGuess {
                quote,
                delimiter,
                pattern: Some(pattern),
            };
        }

        QuoteGuess::default()
    }

    fn captures(&self, pattern: StructuralPattern, text: &str) -> Vec<(char, Option<char>)> {
        let regex = match pattern {
            StructuralPattern::Interior => return self.interior_captures(text),
            StructuralPattern::Leading => &self.leading,
            StructuralPattern::Trailing => &self.trailing,
            StructuralPattern::WholeLine => &self.whole_line,
        };
        regex
            .find_iter(text)
            .filter_map(|m| pattern.capture(m.as_str()))
            .collect()
    }

    /// Interior fields must close with the delimiter that opened them; the
    /// content is extended lazily until it does.
    fn interior_captures(&self, text: &str) -> Vec<(char, Option<char>)> {
        let mut captures = Vec::new();
        let mut start = 0;

        while let Some(open) = self.interior_open.find_at(text, start) {
            let mut chars = open.as_str().chars();
            let (Some(delimiter), Some(quote)) = (chars.next(), chars.last()) else {
                break;
            };

            match closing_offset(&text[open.end()..], quote, delimiter) {
                Some(offset) => {
                    captures.push((quote, Some(delimiter)));
                    start = open.end() + offset;
                }
                None => start = open.start() + delimiter.len_utf8(),
            }
        }

        captures
    }
}

/// Byte offset just past the first `quote` directly followed by `delimiter`
/// on the first line of `rest`.
fn closing_offset(rest: &str, quote: char, delimiter: char) -> Option<usize> {
    let line = &rest[..rest.find(['\r', '\n']).unwrap_or(rest.len())];
    line.match_indices(quote).find_map(|(index, _)| {
        let after = index + quote.len_utf8();
        line[after..]
            .starts_with(delimiter)
            .then(|| after + delimiter.len_utf8())
    })
}

/// Most frequent value; ties go to the value that occurred first.
fn most_frequent<T: Copy + Eq + Hash>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (index, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, index)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}
