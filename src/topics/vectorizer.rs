// Count vectorizer: texts -> sparse bag-of-words rows over a fixed vocabulary.
//
// The vocabulary is the sorted set of tokens produced by the tokenizer on the
// fitting batch. Tokens never seen during fitting are ignored on transform.

use std::collections::{BTreeSet, HashMap};

use super::tokenizer::Tokenizer;

/// Sparse document row: `(term_id, count)` pairs sorted by term id.
pub type BagOfWords = Vec<(usize, u32)>;

#[derive(Debug, Clone)]
pub struct CountVectorizer {
    tokenizer: Tokenizer,
    terms: Vec<String>,
    vocabulary: HashMap<String, usize>,
}

impl CountVectorizer {
    /// Build the vocabulary from `texts`.
    pub fn fit(tokenizer: Tokenizer, texts: &[String]) -> Self {
        let distinct: BTreeSet<String> = texts
            .iter()
            .flat_map(|text| tokenizer.tokenize(text))
            .collect();
        let terms: Vec<String> = distinct.into_iter().collect();
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id))
            .collect();
        Self {
            tokenizer,
            terms,
            vocabulary,
        }
    }

    pub fn transform_one(&self, text: &str) -> BagOfWords {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for token in self.tokenizer.tokenize(text) {
            if let Some(&id) = self.vocabulary.get(&token) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let mut row: BagOfWords = counts.into_iter().collect();
        row.sort_unstable_by_key(|&(id, _)| id);
        row
    }

    pub fn transform(&self, texts: &[String]) -> Vec<BagOfWords> {
        texts.iter().map(|text| self.transform_one(text)).collect()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.terms
    }

    pub fn term(&self, id: usize) -> Option<&str> {
        self.terms.get(id).map(String::as_str)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }
}
