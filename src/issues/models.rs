// Issue data models.
//
// `SourceRecord` is one raw line of the tracker export; `IssueRecord` is the
// normalized, per-version record the rest of the crate works with.

use serde::{Deserialize, Serialize};

/// One issue as it appears in a JSON-lines export.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    #[serde(rename = "idReadable")]
    pub id_readable: String,
    pub created: RawTimestamp,
    #[serde(deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "Affected versions")]
    pub affected_versions: Vec<String>,
}

/// `created` shows up as a number in some exports and a string in others.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawTimestamp {
    /// Integer value, or `None` when it cannot be read as one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawTimestamp::Int(value) => Some(*value),
            RawTimestamp::Float(value) => {
                let whole = value.trunc();
                // i64::MAX as f64 rounds up to 2^63, which is already out of range
                (whole >= i64::MIN as f64 && whole < i64::MAX as f64).then_some(whole as i64)
            }
            RawTimestamp::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RawTimestamp::Int(value) => value.to_string(),
            RawTimestamp::Float(value) => value.to_string(),
            RawTimestamp::Text(text) => format!("{text:?}"),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single issue scoped to one affected version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    id: String,
    ts: i64,
    summary: String,
    description: String,
    version: String,
}

impl IssueRecord {
    pub fn new(
        id: impl Into<String>,
        ts: i64,
        summary: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            ts,
            summary: summary.into(),
            description: description.into(),
            version: version.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ts(&self) -> i64 {
        self.ts
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Summary and description joined by a space, the text fed to the models.
    pub fn text(&self) -> String {
        if self.description.is_empty() {
            return self.summary.clone();
        }
        format!("{} {}", self.summary, self.description)
    }
}
