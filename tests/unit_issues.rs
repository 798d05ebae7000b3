// Unit tests for issue loading and the version-scoped repository.

use std::collections::HashSet;
use std::io::Cursor;

use issuelens::error::LoadError;
use issuelens::issues::loader::{parse_lines, read_repository, LoadPolicy};
use issuelens::issues::models::IssueRecord;
use issuelens::issues::repository::{IssueRepository, RecognizedVersions};

const EXPORT: &str = r#"{"idReadable": "IDEA-1", "created": 1600000000, "summary": "Editor freezes", "description": "Typing lags", "Affected versions": ["2020.2", "2020.3"]}
{"idReadable": "IDEA-2", "created": "1610000000", "summary": "Gradle sync fails", "description": null, "Affected versions": ["2021.1", "2019.3"]}

{"idReadable": "IDEA-3", "created": 1620000000, "summary": "Old bug", "description": "", "Affected versions": ["2018.1"]}
{"idReadable": "IDEA-4", "created": 1630000000, "summary": "Debugger hangs", "description": "On breakpoints", "Affected versions": ["2020.3"]}
"#;

fn load(text: &str, policy: LoadPolicy) -> Result<IssueRepository, LoadError> {
    parse_lines(Cursor::new(text), &RecognizedVersions::default(), policy)
}

// ============================================================
// Loading
// ============================================================

#[test]
fn one_record_per_recognized_version() {
    let repo = load(EXPORT, LoadPolicy::Strict).unwrap();
    assert_eq!(repo.len(), 4);

    let ids: Vec<(&str, &str)> = repo.issues().iter().map(|i| (i.id(), i.version())).collect();
    assert_eq!(
        ids,
        vec![
            ("IDEA-1", "2020.2"),
            ("IDEA-1", "2020.3"),
            ("IDEA-2", "2021.1"),
            ("IDEA-4", "2020.3"),
        ]
    );
}

#[test]
fn string_timestamps_and_null_descriptions_are_accepted() {
    let repo = load(EXPORT, LoadPolicy::Strict).unwrap();
    let issue = &repo.get_by_version("2021.1")[0];
    assert_eq!(issue.ts(), 1_610_000_000);
    assert_eq!(issue.description(), "");
}

#[test]
fn strict_load_aborts_on_first_bad_line() {
    let text = "{\"idReadable\": \"X-1\", \"created\": 1, \"summary\": \"ok\", \"description\": \"\", \"Affected versions\": [\"2021.1\"]}\nnot json\n";
    let err = load(text, LoadPolicy::Strict).unwrap_err();
    assert!(matches!(err, LoadError::Json { line: 2, .. }), "got {err}");
    assert_eq!(err.line(), Some(2));
}

#[test]
fn missing_field_is_a_parse_error() {
    let text = r#"{"idReadable": "X-1", "created": 1, "summary": "no versions", "description": ""}"#;
    assert!(matches!(
        load(text, LoadPolicy::Strict),
        Err(LoadError::Json { line: 1, .. })
    ));
}

#[test]
fn missing_summary_or_description_is_a_parse_error() {
    let no_summary = r#"{"idReadable": "X-1", "created": 1, "description": "d", "Affected versions": ["2021.1"]}"#;
    let err = load(no_summary, LoadPolicy::Strict).unwrap_err();
    assert!(matches!(err, LoadError::Json { line: 1, .. }), "got {err}");
    assert!(err.to_string().contains("summary"), "got {err}");

    let no_description = r#"{"idReadable": "X-1", "created": 1, "summary": "s", "Affected versions": ["2021.1"]}"#;
    assert!(matches!(
        load(no_description, LoadPolicy::Strict),
        Err(LoadError::Json { line: 1, .. })
    ));
}

#[test]
fn explicit_null_summary_is_empty_text() {
    let text = r#"{"idReadable": "X-1", "created": 1, "summary": null, "description": "body", "Affected versions": ["2021.1"]}"#;
    let repo = load(text, LoadPolicy::Strict).unwrap();
    assert_eq!(repo.issues()[0].summary(), "");
}

#[test]
fn overflowing_timestamp_is_a_parse_error() {
    let text = r#"{"idReadable": "X-1", "created": 99999999999999999999, "summary": "s", "description": "d", "Affected versions": ["2021.1"]}"#;
    let err = load(text, LoadPolicy::Strict).unwrap_err();
    assert!(matches!(err, LoadError::InvalidTimestamp { line: 1, .. }), "got {err}");
}

#[test]
fn non_integer_timestamp_is_a_parse_error() {
    let text = r#"{"idReadable": "X-1", "created": "yesterday", "summary": "s", "description": "d", "Affected versions": ["2021.1"]}"#;
    let err = load(text, LoadPolicy::Strict).unwrap_err();
    assert!(matches!(err, LoadError::InvalidTimestamp { line: 1, .. }));
    assert!(err.to_string().contains("yesterday"));
}

#[test]
fn lenient_load_skips_bad_lines() {
    let text = format!("garbage\n{EXPORT}{{\"idReadable\": 5}}\n");
    let repo = load(&text, LoadPolicy::SkipInvalid).unwrap();
    assert_eq!(repo.len(), 4);
}

#[test]
fn read_repository_from_file() {
    let path = std::env::temp_dir().join(format!("issuelens-test-{}.jsonl", std::process::id()));
    std::fs::write(&path, EXPORT).unwrap();
    let repo = read_repository(&path, &RecognizedVersions::default(), LoadPolicy::Strict).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(repo.len(), 4);
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("issuelens-does-not-exist.jsonl");
    let err = read_repository(&path, &RecognizedVersions::default(), LoadPolicy::Strict).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn custom_recognized_versions() {
    let recognized = RecognizedVersions::new(["2018.1"]);
    let repo = parse_lines(Cursor::new(EXPORT), &recognized, LoadPolicy::Strict).unwrap();
    assert_eq!(repo.len(), 1);
    assert_eq!(repo.issues()[0].id(), "IDEA-3");
}

// ============================================================
// Queries
// ============================================================

#[test]
fn get_by_version_preserves_load_order() {
    let repo = load(EXPORT, LoadPolicy::Strict).unwrap();
    let ids: Vec<&str> = repo.get_by_version("2020.3").iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["IDEA-1", "IDEA-4"]);
}

#[test]
fn unknown_version_is_empty_not_error() {
    let repo = load(EXPORT, LoadPolicy::Strict).unwrap();
    assert!(repo.get_by_version("1999.9").is_empty());
}

#[test]
fn versions_partition_the_repository() {
    let repo = load(EXPORT, LoadPolicy::Strict).unwrap();
    let versions = repo.get_versions();
    let expected: HashSet<String> = ["2020.2", "2020.3", "2021.1"]
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(versions, expected);

    let mut total = 0;
    for version in &versions {
        let group = repo.get_by_version(version);
        assert!(!group.is_empty());
        assert!(group.iter().all(|issue| issue.version() == version));
        total += group.len();
    }
    assert_eq!(total, repo.len());
}

#[test]
fn texts_join_summary_and_description() {
    let repo = load(EXPORT, LoadPolicy::Strict).unwrap();
    assert_eq!(
        repo.texts_for_version("2020.2"),
        vec!["Editor freezes Typing lags".to_string()]
    );
}

#[test]
fn repository_from_records() {
    let repo = IssueRepository::new(vec![
        IssueRecord::new("A-1", 1, "s", "d", "2021.1"),
        IssueRecord::new("A-2", 2, "s", "d", "2021.2"),
    ]);
    assert_eq!(repo.len(), 2);
    assert_eq!(repo.sorted_versions(), vec!["2021.1", "2021.2"]);
    assert!(IssueRepository::default().is_empty());
}
