// In-memory issue store with version-scoped queries.

use std::collections::{BTreeSet, HashSet};

use super::models::{IssueRecord, SourceRecord};
use crate::error::LoadError;

/// Versions retained when no allow-list is configured.
pub const DEFAULT_VERSIONS: [&str; 5] = ["2020.2", "2020.3", "2021.1", "2021.2", "2021.3"];

/// Allow-list of version labels kept during loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedVersions(BTreeSet<String>);

impl RecognizedVersions {
    pub fn new<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(versions.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, version: &str) -> bool {
        self.0.contains(version)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RecognizedVersions {
    fn default() -> Self {
        Self::new(DEFAULT_VERSIONS)
    }
}

/// Ordered, read-only collection of issue records.
#[derive(Debug, Clone, Default)]
pub struct IssueRepository {
    issues: Vec<IssueRecord>,
}

impl IssueRepository {
    pub fn new(issues: Vec<IssueRecord>) -> Self {
        Self { issues }
    }

    /// Normalize raw records, one issue per recognized affected version.
    ///
    /// Records are numbered from 1 in iteration order; that number is what a
    /// `LoadError` reports as the line.
    pub fn from_source<I>(records: I, recognized: &RecognizedVersions) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = SourceRecord>,
    {
        let mut issues = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            issues.extend(normalize(record, index + 1, recognized)?);
        }
        Ok(Self { issues })
    }

    /// All issues tagged with `version`, in load order.
    pub fn get_by_version(&self, version: &str) -> Vec<&IssueRecord> {
        self.issues
            .iter()
            .filter(|issue| issue.version() == version)
            .collect()
    }

    pub fn get_versions(&self) -> HashSet<String> {
        self.issues
            .iter()
            .map(|issue| issue.version().to_string())
            .collect()
    }

    /// Versions present, sorted for display.
    pub fn sorted_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self.get_versions().into_iter().collect();
        versions.sort();
        versions
    }

    pub fn texts_for_version(&self, version: &str) -> Vec<String> {
        self.get_by_version(version)
            .into_iter()
            .map(IssueRecord::text)
            .collect()
    }

    pub fn issues(&self) -> &[IssueRecord] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Expand one raw record into its per-version issues.
pub(crate) fn normalize(
    record: SourceRecord,
    line: usize,
    recognized: &RecognizedVersions,
) -> Result<Vec<IssueRecord>, LoadError> {
    let ts = record
        .created
        .as_i64()
        .ok_or_else(|| LoadError::InvalidTimestamp {
            line,
            value: record.created.describe(),
        })?;

    Ok(record
        .affected_versions
        .iter()
        .filter(|version| recognized.contains(version))
        .map(|version| {
            IssueRecord::new(
                record.id_readable.clone(),
                ts,
                record.summary.clone(),
                record.description.clone(),
                version.clone(),
            )
        })
        .collect())
}
