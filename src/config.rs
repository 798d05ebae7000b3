use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::issues::repository::RecognizedVersions;
use crate::topics::naive::FrequencyBand;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy; command-line
/// flags override anything set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-lines issue export (ISSUELENS_DATA_PATH)
    pub data_path: PathBuf,
    /// Version labels kept while loading (ISSUELENS_VERSIONS, comma separated)
    pub versions: RecognizedVersions,
    /// How many terms to report per version (ISSUELENS_N_WORDS)
    pub n_words: usize,
    /// Document-frequency band (ISSUELENS_MIN_FREQ / ISSUELENS_MAX_FREQ)
    pub band: FrequencyBand,
    /// Seed for topic model fitting (ISSUELENS_SEED)
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (used by `load` and tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let versions = match lookup("ISSUELENS_VERSIONS") {
            Some(raw) => {
                let versions = RecognizedVersions::new(
                    raw.split(',').map(str::trim).filter(|v| !v.is_empty()),
                );
                if versions.is_empty() {
                    anyhow::bail!("ISSUELENS_VERSIONS is set but lists no versions");
                }
                versions
            }
            None => RecognizedVersions::default(),
        };

        let band = FrequencyBand {
            min_freq: parse_var(&lookup, "ISSUELENS_MIN_FREQ")?.unwrap_or(0.0),
            max_freq: parse_var(&lookup, "ISSUELENS_MAX_FREQ")?.unwrap_or(1.0),
        };
        band.validate().context("Invalid ISSUELENS_MIN_FREQ / ISSUELENS_MAX_FREQ")?;

        Ok(Self {
            data_path: lookup("ISSUELENS_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./issues.jsonl")),
            versions,
            n_words: parse_var(&lookup, "ISSUELENS_N_WORDS")?.unwrap_or(10),
            band,
            seed: parse_var(&lookup, "ISSUELENS_SEED")?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(None),
    }
}
