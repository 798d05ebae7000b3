// Document-frequency band filter.
//
// Drops tokens that are too common (appear in most documents) or too rare
// across a batch, before any scoring happens.

use std::collections::{HashMap, HashSet};

/// Fraction of documents in which each token appears at least once.
///
/// An empty batch yields an empty map.
pub fn document_frequencies(docs: &[Vec<String>]) -> HashMap<String, f64> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for doc in docs {
        let distinct: HashSet<&str> = doc.iter().map(String::as_str).collect();
        for token in distinct {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let total = docs.len() as f64;
    counts
        .into_iter()
        .map(|(token, count)| (token.to_string(), count as f64 / total))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreqController {
    pub min_freq: f64,
    pub max_freq: f64,
}

impl Default for FreqController {
    fn default() -> Self {
        Self {
            min_freq: 0.0,
            max_freq: 1.0,
        }
    }
}

impl FreqController {
    pub fn new(min_freq: f64, max_freq: f64) -> Self {
        Self { min_freq, max_freq }
    }

    /// Keep only tokens whose document frequency lies in `[min_freq, max_freq]`.
    ///
    /// Per-document order and multiplicity of surviving tokens are preserved.
    /// With `min_freq > max_freq` every document comes back empty.
    pub fn filter(&self, docs: &[Vec<String>]) -> Vec<Vec<String>> {
        if docs.is_empty() {
            return Vec::new();
        }

        let freqs = document_frequencies(docs);
        docs.iter()
            .map(|doc| {
                doc.iter()
                    .filter(|token| {
                        let df = freqs.get(token.as_str()).copied().unwrap_or(0.0);
                        self.min_freq <= df && df <= self.max_freq
                    })
                    .cloned()
                    .collect()
            })
            .collect()
    }
}
