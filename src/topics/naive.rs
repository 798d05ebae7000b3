// Frequency-based term ranking.
//
// The "naive" model: tokenize every document, apply the document-frequency
// band, then rank the surviving vocabulary by term frequency or TF-IDF. Ties
// keep the order in which tokens were first seen across the batch, so the
// output is fully deterministic.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::freq::FreqController;
use super::tokenizer::Tokenizer;
use crate::error::ConfigError;

/// Per-token scores in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TermScores {
    entries: Vec<(String, f64)>,
}

impl TermScores {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(t, s)| (t.as_str(), *s))
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, s)| s).sum()
    }

    /// Stable descending sort by score, truncated to `limit`.
    pub fn ranked(mut self, limit: usize) -> Vec<(String, f64)> {
        self.entries
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        self.entries.truncate(limit);
        self.entries
    }
}

/// Counts tokens in first-occurrence order.
fn ordered_counts<'a, I>(tokens: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for token in tokens {
        let i = *index.entry(token).or_insert_with(|| {
            counts.push((token, 0));
            counts.len() - 1
        });
        counts[i].1 += 1;
    }
    counts
}

/// Occurrences of each token divided by all token occurrences in the batch.
pub fn term_frequencies(docs: &[Vec<String>]) -> TermScores {
    let total: usize = docs.iter().map(Vec::len).sum();
    let counts = ordered_counts(docs.iter().flatten().map(String::as_str));
    TermScores {
        entries: counts
            .into_iter()
            .map(|(token, count)| (token.to_string(), count as f64 / total as f64))
            .collect(),
    }
}

/// `ln(N / df)` where `df` is the number of documents containing the token.
pub fn inverse_document_frequencies(docs: &[Vec<String>]) -> TermScores {
    let n_docs = docs.len() as f64;
    let counts = ordered_counts(docs.iter().flat_map(|doc| {
        let mut seen = HashSet::new();
        doc.iter()
            .map(String::as_str)
            .filter(move |token| seen.insert(*token))
    }));
    TermScores {
        entries: counts
            .into_iter()
            .map(|(token, df)| (token.to_string(), (n_docs / df as f64).ln()))
            .collect(),
    }
}

/// Document-frequency band passed through to the `FreqController`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub min_freq: f64,
    pub max_freq: f64,
}

impl Default for FrequencyBand {
    fn default() -> Self {
        Self {
            min_freq: 0.0,
            max_freq: 1.0,
        }
    }
}

impl FrequencyBand {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for bound in [self.min_freq, self.max_freq] {
            if !(0.0..=1.0).contains(&bound) {
                return Err(ConfigError::FrequencyOutOfRange(bound));
            }
        }
        if self.min_freq > self.max_freq {
            return Err(ConfigError::InvalidFrequencyBand {
                min_freq: self.min_freq,
                max_freq: self.max_freq,
            });
        }
        Ok(())
    }
}

/// Ranks the vocabulary of a batch of raw texts by TF or TF-IDF.
#[derive(Debug, Clone)]
pub struct NaiveModel {
    n_words: usize,
    tokenizer: Tokenizer,
    freq_controller: FreqController,
}

impl NaiveModel {
    pub fn new(n_words: usize, tokenizer: Tokenizer, band: FrequencyBand) -> Result<Self, ConfigError> {
        if n_words == 0 {
            return Err(ConfigError::InvalidWordCount);
        }
        band.validate()?;
        Ok(Self {
            n_words,
            tokenizer,
            freq_controller: FreqController::new(band.min_freq, band.max_freq),
        })
    }

    pub fn n_words(&self) -> usize {
        self.n_words
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Tokenize and band-filter a batch of texts.
    pub fn prepare(&self, texts: &[String]) -> Vec<Vec<String>> {
        let tokens: Vec<Vec<String>> = texts.iter().map(|t| self.tokenizer.tokenize(t)).collect();
        let filtered = self.freq_controller.filter(&tokens);
        debug!(
            documents = filtered.len(),
            tokens = filtered.iter().map(Vec::len).sum::<usize>(),
            "Prepared document batch"
        );
        filtered
    }

    pub fn ranked_tf(&self, texts: &[String]) -> Vec<(String, f64)> {
        let docs = self.prepare(texts);
        term_frequencies(&docs).ranked(self.n_words)
    }

    pub fn ranked_tf_idf(&self, texts: &[String]) -> Vec<(String, f64)> {
        let docs = self.prepare(texts);
        let tfs = term_frequencies(&docs);
        let idfs: HashMap<String, f64> = inverse_document_frequencies(&docs)
            .entries
            .into_iter()
            .collect();

        let scores = TermScores {
            entries: tfs
                .entries
                .into_iter()
                .map(|(token, tf)| {
                    let idf = idfs.get(&token).copied().unwrap_or(0.0);
                    (token, tf * idf)
                })
                .collect(),
        };
        scores.ranked(self.n_words)
    }

    /// Top `n_words` tokens by term frequency.
    pub fn most_tf_words(&self, texts: &[String]) -> Vec<String> {
        self.ranked_tf(texts).into_iter().map(|(t, _)| t).collect()
    }

    /// Top `n_words` tokens by TF-IDF.
    pub fn most_tf_idf_words(&self, texts: &[String]) -> Vec<String> {
        self.ranked_tf_idf(texts).into_iter().map(|(t, _)| t).collect()
    }
}
