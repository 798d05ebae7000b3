// JSON-lines loader for issue tracker exports.
//
// Each non-blank line is one issue object. Under the default strict policy
// the first bad line aborts the load; `SkipInvalid` logs it and moves on.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use super::models::SourceRecord;
use super::repository::{normalize, IssueRepository, RecognizedVersions};
use crate::error::LoadError;

/// What to do with a line that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    #[default]
    Strict,
    SkipInvalid,
}

/// Parse an export from any buffered reader.
pub fn parse_lines<R: BufRead>(
    reader: R,
    recognized: &RecognizedVersions,
    policy: LoadPolicy,
) -> Result<IssueRepository, LoadError> {
    let mut issues = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed = serde_json::from_str::<SourceRecord>(&line)
            .map_err(|source| LoadError::Json {
                line: line_no,
                source,
            })
            .and_then(|record| normalize(record, line_no, recognized));

        match parsed {
            Ok(records) => issues.extend(records),
            Err(e) if policy == LoadPolicy::SkipInvalid => {
                warn!(line = line_no, error = %e, "Skipping invalid issue record");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(issues = issues.len(), skipped, "Loaded issue records");
    Ok(IssueRepository::new(issues))
}

/// Load an export file from disk.
pub fn read_repository(
    path: &Path,
    recognized: &RecognizedVersions,
    policy: LoadPolicy,
) -> Result<IssueRepository, LoadError> {
    let file = File::open(path)?;
    parse_lines(BufReader::new(file), recognized, policy)
}
