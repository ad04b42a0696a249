//! Pull-based cursor over an in-memory sample.
//!
//! The classifiers re-read a sample row by row. `SampleReader` keeps that
//! cursor state out of the detection logic: it owns the position, honours the
//! dialect's blank line policy and can be rewound.

use super::{Dialect, Tokenizer};

/// One tokenized line of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    /// Zero-based physical line number within the sample.
    pub line_number: usize,
    /// The untokenized line.
    pub raw: &'a str,
    /// Parsed field values.
    pub fields: Vec<String>,
}

/// Cursor yielding the records of a sample under one dialect.
#[derive(Debug, Clone)]
pub struct SampleReader<'a> {
    lines: Vec<&'a str>,
    tokenizer: Tokenizer,
    skip_blank_lines: bool,
    cursor: usize,
    position: usize,
    skipped: usize,
}

impl<'a> SampleReader<'a> {
    /// Create a reader over `sample`, splitting lines on the dialect's terminator.
    ///
    /// Trailing terminator characters are ignored so a final line break does
    /// not produce an extra empty line.
    pub fn new(sample: &'a str, dialect: &Dialect) -> Self {
        let trimmed = sample.trim_end_matches(['\r', '\n']);
        let lines = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split(dialect.line_terminator.as_str()).collect()
        };

        Self {
            lines,
            tokenizer: Tokenizer::new(dialect),
            skip_blank_lines: dialect.skip_blank_lines,
            cursor: 0,
            position: 0,
            skipped: 0,
        }
    }

    /// Load the next record, or `None` once the sample is exhausted.
    pub fn advance(&mut self) -> Option<Record<'a>> {
        while let Some(&raw) = self.lines.get(self.cursor) {
            let line_number = self.cursor;
            self.cursor += 1;

            if raw.is_empty() && self.skip_blank_lines {
                self.skipped += 1;
                continue;
            }

            self.position += 1;
            return Some(Record {
                line_number,
                raw,
                fields: self.tokenizer.tokenize(raw),
            });
        }
        None
    }

    /// Rewind to the first line.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.position = 0;
        self.skipped = 0;
    }

    /// Number of records returned since the last reset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of blank lines skipped since the last reset.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    /// Total number of records in the sample, independent of the cursor.
    pub fn record_count(&self) -> usize {
        if self.skip_blank_lines {
            self.lines.iter().filter(|line| !line.is_empty()).count()
        } else {
            self.lines.len()
        }
    }
}

impl<'a> Iterator for SampleReader<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::LineTerminator;

    fn lf_dialect() -> Dialect {
        Dialect::default().with_line_terminator(LineTerminator::Lf)
    }

    #[test]
    fn test_reads_records_in_order() {
        let dialect = lf_dialect();
        let mut reader = SampleReader::new("a,b\nc,\"d,e\"\n", &dialect);

        let first = reader.advance().unwrap();
        assert_eq!(first.line_number, 0);
        assert_eq!(first.fields, vec!["a", "b"]);

        let second = reader.advance().unwrap();
        assert_eq!(second.raw, "c,\"d,e\"");
        assert_eq!(second.fields, vec!["c", "d,e"]);

        assert!(reader.advance().is_none());
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_skips_blank_lines() {
        let dialect = lf_dialect();
        let mut reader = SampleReader::new("a\n\nb\n\n\nc", &dialect);

        let lines: Vec<usize> = reader.by_ref().map(|r| r.line_number).collect();
        assert_eq!(lines, vec![0, 2, 5]);
        assert_eq!(reader.skipped_lines(), 3);
        assert_eq!(reader.record_count(), 3);
    }

    #[test]
    fn test_keeps_blank_lines_when_asked() {
        let dialect = lf_dialect().with_skip_blank_lines(false);
        let reader = SampleReader::new("a\n\nb", &dialect);

        let records: Vec<Record<'_>> = reader.collect();
        assert_eq!(records.len(), 3);
        assert!(records[1].fields.is_empty());
    }

    #[test]
    fn test_reset_rewinds() {
        let dialect = lf_dialect();
        let mut reader = SampleReader::new("1\n2\n3", &dialect);

        assert_eq!(reader.by_ref().count(), 3);
        reader.reset();
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.advance().unwrap().fields, vec!["1"]);
    }

    #[test]
    fn test_crlf_terminator() {
        let dialect = Dialect::new(';');
        let reader = SampleReader::new("a;b\r\nc;d\r\n", &dialect);
        assert_eq!(reader.record_count(), 2);
    }

    #[test]
    fn test_empty_sample() {
        let dialect = lf_dialect();
        let mut reader = SampleReader::new("", &dialect);
        assert_eq!(reader.record_count(), 0);
        assert!(reader.advance().is_none());
    }
}
