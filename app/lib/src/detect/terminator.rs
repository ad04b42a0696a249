//! Line terminator detection.

use crate::dialect::LineTerminator;

/// Pick the line terminator of a raw sample from its total `\r` and `\n` counts.
///
/// Equal counts (including none at all) mean `\r\n`; only `\n` means `\n`;
/// only `\r` means `\r`. Any other mix falls back to `\r\n`.
pub fn detect_line_terminator(sample: &str) -> LineTerminator {
    let (cr, lf) = sample.bytes().fold((0usize, 0usize), |(cr, lf), b| match b {
        b'\r' => (cr + 1, lf),
        b'\n' => (cr, lf + 1),
        _ => (cr, lf),
    });

    match (cr, lf) {
        _ if cr == lf => LineTerminator::CrLf,
        (0, _) => LineTerminator::Lf,
        (_, 0) => LineTerminator::Cr,
        _ => LineTerminator::CrLf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lf_only() {
        assert_eq!(detect_line_terminator("a\nb\nc\n"), LineTerminator::Lf);
    }

    #[test]
    fn test_cr_only() {
        assert_eq!(detect_line_terminator("a\rb\rc"), LineTerminator::Cr);
    }

    #[test]
    fn test_crlf() {
        assert_eq!(detect_line_terminator("a\r\nb\r\n"), LineTerminator::CrLf);
    }

    #[test]
    fn test_no_terminators_defaults_to_crlf() {
        assert_eq!(detect_line_terminator("abc"), LineTerminator::CrLf);
        assert_eq!(detect_line_terminator(""), LineTerminator::CrLf);
    }

    #[test]
    fn test_mixed_counts_default_to_crlf() {
        assert_eq!(detect_line_terminator("a\r\nb\nc\n"), LineTerminator::CrLf);
    }
}
