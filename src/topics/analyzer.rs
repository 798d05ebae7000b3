// Topic analysis over raw issue texts.
//
// Glues the tokenizer, the count vectorizer, and any TopicBackend together:
// fit on a batch of texts, then ask for topic terms or per-document topic ids.
// Also hosts the u_mass coherence sweep used to pick a topic count.

use std::collections::HashSet;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::tokenizer::Tokenizer;
use super::traits::{TopicBackend, TopicModel};
use super::vectorizer::{BagOfWords, CountVectorizer};
use crate::error::TopicError;

/// Topic id reported for a document that could not be assigned a topic.
pub const NO_TOPIC: i64 = -1;

/// Terms per topic used by the coherence measure.
const COHERENCE_TOP_N: usize = 20;

/// Terms shown by `describe_topic`.
const DESCRIBE_TOP_N: usize = 10;

struct Fitted<M> {
    vectorizer: CountVectorizer,
    model: M,
}

pub struct TopicAnalyzer<B: TopicBackend> {
    n_components: usize,
    tokenizer: Tokenizer,
    backend: B,
    seed: Option<u64>,
    fitted: Option<Fitted<B::Model>>,
}

impl<B: TopicBackend> TopicAnalyzer<B> {
    pub fn new(n_components: usize, tokenizer: Tokenizer, backend: B, seed: Option<u64>) -> Self {
        Self {
            n_components,
            tokenizer,
            backend,
            seed,
            fitted: None,
        }
    }

    pub fn fit(&mut self, texts: &[String]) -> Result<&mut Self, TopicError> {
        if texts.is_empty() {
            return Err(TopicError::EmptyCorpus);
        }
        let vectorizer = CountVectorizer::fit(self.tokenizer.clone(), texts);
        let corpus = vectorizer.transform(texts);
        let model = self.backend.fit(
            &corpus,
            vectorizer.vocabulary_size(),
            self.n_components,
            self.seed,
        )?;

        info!(
            documents = texts.len(),
            vocabulary = vectorizer.vocabulary_size(),
            topics = self.n_components,
            "Fitted topic model"
        );

        self.fitted = Some(Fitted { vectorizer, model });
        Ok(self)
    }

    fn fitted(&self) -> Result<&Fitted<B::Model>, TopicError> {
        self.fitted.as_ref().ok_or(TopicError::NotFitted)
    }

    pub fn model(&self) -> Result<&B::Model, TopicError> {
        Ok(&self.fitted()?.model)
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// The `top_n` terms of a topic, most probable first.
    pub fn topic_terms(&self, topic: usize, top_n: usize) -> Result<Vec<String>, TopicError> {
        let fitted = self.fitted()?;
        Ok(fitted
            .model
            .topic_terms(topic, top_n)?
            .into_iter()
            .filter_map(|(id, _)| fitted.vectorizer.term(id).map(str::to_string))
            .collect())
    }

    /// Weighted term list such as `0.120*"crash" + 0.080*"editor"`.
    pub fn describe_topic(&self, topic: usize) -> Result<String, TopicError> {
        let fitted = self.fitted()?;
        let parts: Vec<String> = fitted
            .model
            .topic_terms(topic, DESCRIBE_TOP_N)?
            .into_iter()
            .filter_map(|(id, weight)| {
                fitted
                    .vectorizer
                    .term(id)
                    .map(|term| format!("{weight:.3}*\"{term}\""))
            })
            .collect();
        Ok(parts.join(" + "))
    }

    /// The dominant topic id of every text, `NO_TOPIC` when none applies.
    pub fn topics(&self, texts: &[String]) -> Result<Vec<i64>, TopicError> {
        let fitted = self.fitted()?;
        Ok(texts
            .iter()
            .map(|text| {
                let row = fitted.vectorizer.transform_one(text);
                fitted
                    .model
                    .assign(&row)
                    .map_or(NO_TOPIC, |topic| topic as i64)
            })
            .collect())
    }
}

/// Mean u_mass coherence of a fitted model over its vectorized corpus.
///
/// For each topic, over its top terms ranked `w_1..w_n`, averages
/// `ln((D(w_i, w_j) + 1e-12) / D(w_j))` for every `j < i`, where `D` counts
/// documents containing the term(s).
pub fn umass_coherence<M: TopicModel>(model: &M, corpus: &[BagOfWords]) -> Result<f64, TopicError> {
    let doc_sets: Vec<HashSet<usize>> = corpus
        .iter()
        .map(|row| row.iter().filter(|(_, c)| *c > 0).map(|(id, _)| *id).collect())
        .collect();
    let doc_count = |terms: &[usize]| {
        doc_sets
            .iter()
            .filter(|set| terms.iter().all(|t| set.contains(t)))
            .count() as f64
    };

    let mut topic_scores = Vec::with_capacity(model.n_topics());
    for topic in 0..model.n_topics() {
        let top: Vec<usize> = model
            .topic_terms(topic, COHERENCE_TOP_N)?
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        let mut sum = 0.0;
        let mut pairs = 0usize;
        for i in 1..top.len() {
            for j in 0..i {
                let denominator = doc_count(&[top[j]]);
                if denominator == 0.0 {
                    continue;
                }
                sum += ((doc_count(&[top[i], top[j]]) + 1e-12) / denominator).ln();
                pairs += 1;
            }
        }
        topic_scores.push(if pairs == 0 { 0.0 } else { sum / pairs as f64 });
    }

    if topic_scores.is_empty() {
        return Ok(0.0);
    }
    Ok(topic_scores.iter().sum::<f64>() / topic_scores.len() as f64)
}

/// Fit one model per candidate topic count and score each by u_mass coherence.
pub fn coherence_scores<B: TopicBackend>(
    tokenizer: &Tokenizer,
    texts: &[String],
    components: &[usize],
    backend: &B,
    seed: Option<u64>,
) -> Result<Vec<f64>, TopicError> {
    if texts.is_empty() {
        return Err(TopicError::EmptyCorpus);
    }
    let vectorizer = CountVectorizer::fit(tokenizer.clone(), texts);
    let corpus = vectorizer.transform(texts);

    let pb = ProgressBar::new(components.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Coherence [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut scores = Vec::with_capacity(components.len());
    for &n_topics in components {
        let model = backend.fit(&corpus, vectorizer.vocabulary_size(), n_topics, seed)?;
        let score = umass_coherence(&model, &corpus)?;
        info!(n_topics, coherence = score, "Scored topic count");
        scores.push(score);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(scores)
}
