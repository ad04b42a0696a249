//! End-to-end detection scenarios.

use csv_dialect::{
    detect, has_header, sniff, tokenize, Dialect, DialectDetector, DialectError, LineTerminator,
    QuotingStyle, SampleReader,
};

fn pipe_sample(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("{}|user{}|{}|active", i, i, i * 7))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_pipe_separated_sample() {
    let dialect = detect(&pipe_sample(20)).unwrap();

    assert_eq!(dialect.delimiter, '|');
    assert_eq!(dialect.quote_char, Some('"'));
    assert_eq!(dialect.quoting, QuotingStyle::None);
}

#[test]
fn test_fully_quoted_comma_sample() {
    let sample: String = (0..20)
        .map(|i| format!("\"{}\",\"name {}\",\"x\"\r\n", i, i))
        .collect();
    let dialect = detect(&sample).unwrap();

    assert_eq!(dialect.delimiter, ',');
    assert_eq!(dialect.quoting, QuotingStyle::All);
    assert_eq!(dialect.line_terminator, LineTerminator::CrLf);
}

#[test]
fn test_tab_sample_with_header() {
    let mut lines = vec!["code\tamount\tflag".to_string()];
    lines.extend((0..11).map(|i| format!("AB{}\t{}\tY", i, 100 + i)));
    let sample = lines.join("\n");

    assert!(has_header(&sample).unwrap());

    // Dropping the header row leaves only look-alike rows.
    let body = lines[1..].join("\n");
    assert!(!has_header(&body).unwrap());
}

#[test]
fn test_tokenize_quoted_delimiter() {
    let dialect = Dialect::new(',').with_quote_char(Some('"'));
    assert_eq!(tokenize("a,\"b,c\",d", &dialect), vec!["a", "b,c", "d"]);
}

#[test]
fn test_detected_dialect_reads_sample() {
    let sample = (0..12)
        .map(|i| format!("{};\"note; {}\";{}", i, i, i * 2))
        .collect::<Vec<_>>()
        .join("\n");
    let dialect = detect(&sample).unwrap();
    assert_eq!(dialect.delimiter, ';');

    let rows: Vec<Vec<String>> = SampleReader::new(&sample, &dialect)
        .map(|record| record.fields)
        .collect();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[3], vec!["3", "note; 3", "6"]);
}

#[test]
fn test_short_sample_errors() {
    let err = detect("a,b\nc,d\n").unwrap_err();
    assert!(matches!(err, DialectError::DataSampleTooShort { .. }));
    assert!(!has_header("a,b\nc,d\ne,f").unwrap());
}

#[test]
fn test_undeterminable_sample_errors() {
    let sample = (0..12)
        .map(|i| if i % 3 == 0 { "one, two; three" } else { "four five six" })
        .collect::<Vec<_>>()
        .join("\n");
    let err = detect(&sample).unwrap_err();
    assert!(matches!(err, DialectError::CannotDetermineDialect { .. }));
}

#[test]
fn test_sniff_short_sample() {
    let dialect = sniff("a:b:c\nd:e:f").unwrap();
    assert_eq!(dialect.delimiter, ':');
    assert_eq!(dialect.quote_char, None);
}

#[test]
fn test_detection_is_repeatable_across_threads() {
    let detector = std::sync::Arc::new(DialectDetector::new().unwrap());
    let sample = std::sync::Arc::new(pipe_sample(15));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let detector = detector.clone();
            let sample = sample.clone();
            std::thread::spawn(move || detector.detect(&sample).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().delimiter, '|');
    }
}
