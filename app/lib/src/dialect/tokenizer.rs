//! Quote-aware line tokenizer.
//!
//! Splits a single physical line into fields according to a [`Dialect`].
//! Tokenizing never fails: malformed quoting produces a best-effort field list.

use super::Dialect;

/// Position of the tokenizer within the current field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    /// Nothing consumed yet for this field.
    Start,
    /// Inside an unquoted field.
    Unquoted,
    /// Inside a quoted region.
    Quoted,
    /// After the closing quote, before the next delimiter.
    AfterQuote,
}

/// Splits lines into fields for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    delimiter: char,
    quote: Option<char>,
    escape: Option<char>,
}

impl Tokenizer {
    /// Create a tokenizer for the given dialect.
    pub fn new(dialect: &Dialect) -> Self {
        Self {
            delimiter: dialect.delimiter,
            quote: dialect.quote_char,
            escape: dialect.active_escape(),
        }
    }

    /// Split one physical line into fields.
    ///
    /// An empty line yields no fields. A quote only opens a quoted region at
    /// the start of a field; inside the region a doubled quote stands for a
    /// literal quote, and an escape-prefixed quote is kept until the unescape
    /// pass turns it into a bare quote.
    pub fn tokenize(&self, line: &str) -> Vec<String> {
        if line.is_empty() {
            return Vec::new();
        }

        let mut fields = Vec::new();
        let mut field = String::new();
        let mut state = FieldState::Start;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match state {
                FieldState::Start if Some(c) == self.quote => {
                    state = FieldState::Quoted;
                }
                FieldState::Start | FieldState::Unquoted | FieldState::AfterQuote
                    if c == self.delimiter =>
                {
                    fields.push(std::mem::take(&mut field));
                    state = FieldState::Start;
                }
                FieldState::Start => {
                    field.push(c);
                    state = FieldState::Unquoted;
                }
                FieldState::Unquoted | FieldState::AfterQuote => field.push(c),
                FieldState::Quoted => {
                    if Some(c) == self.escape && chars.peek().copied() == self.quote {
                        field.push(c);
                        if let Some(quote) = chars.next() {
                            field.push(quote);
                        }
                    } else if Some(c) == self.quote {
                        if chars.peek().copied() == self.quote {
                            chars.next();
                            field.push(c);
                        } else {
                            state = FieldState::AfterQuote;
                        }
                    } else {
                        field.push(c);
                    }
                }
            }
        }
        fields.push(field);

        if let (Some(escape), Some(quote)) = (self.escape, self.quote) {
            let escaped: String = [escape, quote].iter().collect();
            let bare = quote.to_string();
            for field in fields.iter_mut() {
                if field.contains(&escaped) {
                    *field = field.replace(&escaped, &bare);
                }
            }
        }

        fields
    }
}

/// Split one physical line into fields according to `dialect`.
pub fn tokenize(line: &str, dialect: &Dialect) -> Vec<String> {
    Tokenizer::new(dialect).tokenize(line)
}
