use std::{fs, path::Path};

use review_insights::{AnalysisError, AnalysisOptions, analyze_csv};
use tempfile::TempDir;

const INPUT: &str = "\
review_id,review_text,rating,review_date,reply_content,entity_code
r1,\"Login keeps failing, OTP error\",1,2025-05-30T08:15:00+00:00,,CBE
r2,Great app very easy,5,2025-05-29T10:00:00+00:00,\"Thanks, we appreciate it\",BOA
r3,,3,2025-05-28T10:00:00+00:00,,CBE
r4,OTP never arrives and login is impossible,2,2025-05-27T10:00:00+00:00,,CBE
";

fn read(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Splits one CSV line into fields, honoring double quotes.
fn fields(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => out.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    out.push(current);
    out
}

#[test]
fn original_columns_round_trip_and_enrichment_is_appended() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out").join("analysis.csv");
    fs::write(&input, INPUT).unwrap();

    let summary = analyze_csv(&input, &output, &AnalysisOptions::default()).unwrap();
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.output, output);

    let in_lines: Vec<String> = INPUT.lines().map(str::to_string).collect();
    let out_lines = read(&output);
    assert_eq!(out_lines.len(), in_lines.len());

    let header = fields(&out_lines[0]);
    assert_eq!(
        &header[6..],
        &["sentiment_label", "sentiment_score", "keywords", "identified_theme"]
    );

    for (before, after) in in_lines.iter().zip(&out_lines).skip(1) {
        let before = fields(before);
        let after = fields(after);
        assert_eq!(after.len(), before.len() + 4);
        assert_eq!(&after[..before.len()], &before[..], "original values must be untouched");
    }

    let row = |i: usize| fields(&out_lines[i]);
    assert_eq!(row(1)[6], "negative");
    assert!(row(1)[9].contains("Account Access Issues"));
    assert_eq!(row(2)[6], "positive");

    // Empty text: neutral, zero, and the group's keywords.
    assert_eq!(row(3)[6], "neutral");
    assert_eq!(row(3)[7].parse::<f64>().unwrap(), 0.0);
    assert_eq!(row(3)[8], row(1)[8]);
    assert_eq!(row(4)[8], row(1)[8]);
}

#[test]
fn header_only_input_is_empty() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.csv");
    fs::write(&input, "review_id,review_text,entity_code\n").unwrap();

    let err = analyze_csv(&input, &dir.path().join("out.csv"), &AnalysisOptions::default())
        .unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyInput), "got {err}");
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn input_without_review_text_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.csv");
    fs::write(&input, "review_id,content\nr1,hello\n").unwrap();

    let err = analyze_csv(&input, &dir.path().join("out.csv"), &AnalysisOptions::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "Input dataset has no 'review_text' column");
}

#[test]
fn missing_input_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = analyze_csv(
        &dir.path().join("nope.csv"),
        &dir.path().join("out.csv"),
        &AnalysisOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::InputNotFound { .. }));
}
