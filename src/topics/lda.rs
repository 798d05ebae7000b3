// Latent Dirichlet Allocation via collapsed Gibbs sampling.
//
// The bundled `TopicBackend`. Fitting is reproducible for a fixed seed; the
// per-document inference on a fitted model is a deterministic fixed-point
// iteration with the topic-word distributions held fixed.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::traits::{TopicBackend, TopicModel, MIN_TOPIC_WEIGHT};
use super::vectorizer::BagOfWords;
use crate::error::TopicError;

/// Fixed-point iterations used to infer a document's topic mixture.
const INFERENCE_ITERATIONS: usize = 50;

/// Gibbs sampler configuration.
#[derive(Debug, Clone)]
pub struct GibbsLda {
    /// Document-topic prior
    pub alpha: f64,
    /// Topic-word prior
    pub beta: f64,
    /// Full sweeps over the corpus
    pub iterations: usize,
}

impl Default for GibbsLda {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 0.01,
            iterations: 200,
        }
    }
}

/// A fitted LDA model: the smoothed topic-word distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct LdaModel {
    alpha: f64,
    /// n_topics x vocab_size, each row sums to 1
    phi: Array2<f64>,
}

impl TopicBackend for GibbsLda {
    type Model = LdaModel;

    fn fit(
        &self,
        corpus: &[BagOfWords],
        vocab_size: usize,
        n_topics: usize,
        seed: Option<u64>,
    ) -> Result<LdaModel, TopicError> {
        if n_topics == 0 {
            return Err(TopicError::InvalidTopicCount);
        }
        if corpus.is_empty() {
            return Err(TopicError::EmptyCorpus);
        }
        if vocab_size == 0 {
            return Err(TopicError::EmptyVocabulary);
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        // Expand each sparse row into one entry per word occurrence
        let words: Vec<Vec<usize>> = corpus
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|&&(w, _)| w < vocab_size)
                    .flat_map(|&(w, count)| std::iter::repeat(w).take(count as usize))
                    .collect()
            })
            .collect();

        let mut doc_topic: Array2<f64> = Array2::zeros((words.len(), n_topics));
        let mut topic_word: Array2<f64> = Array2::zeros((n_topics, vocab_size));
        let mut topic_total: Array1<f64> = Array1::zeros(n_topics);
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(words.len());

        for (d, doc) in words.iter().enumerate() {
            let mut z = Vec::with_capacity(doc.len());
            for &w in doc {
                let t = rng.random_range(0..n_topics);
                doc_topic[[d, t]] += 1.0;
                topic_word[[t, w]] += 1.0;
                topic_total[t] += 1.0;
                z.push(t);
            }
            assignments.push(z);
        }

        let v_beta = vocab_size as f64 * self.beta;
        let mut probs = vec![0.0; n_topics];

        for _ in 0..self.iterations {
            for (d, doc) in words.iter().enumerate() {
                for (i, &w) in doc.iter().enumerate() {
                    let old = assignments[d][i];
                    doc_topic[[d, old]] -= 1.0;
                    topic_word[[old, w]] -= 1.0;
                    topic_total[old] -= 1.0;

                    let mut cumulative = 0.0;
                    for (t, p) in probs.iter_mut().enumerate() {
                        cumulative += (doc_topic[[d, t]] + self.alpha)
                            * (topic_word[[t, w]] + self.beta)
                            / (topic_total[t] + v_beta);
                        *p = cumulative;
                    }

                    let u = rng.random::<f64>() * cumulative;
                    let new = probs.iter().position(|&c| u < c).unwrap_or(n_topics - 1);

                    doc_topic[[d, new]] += 1.0;
                    topic_word[[new, w]] += 1.0;
                    topic_total[new] += 1.0;
                    assignments[d][i] = new;
                }
            }
        }

        let phi = Array2::from_shape_fn((n_topics, vocab_size), |(t, w)| {
            (topic_word[[t, w]] + self.beta) / (topic_total[t] + v_beta)
        });

        debug!(
            documents = corpus.len(),
            vocab_size,
            n_topics,
            iterations = self.iterations,
            "Fitted LDA model"
        );

        Ok(LdaModel {
            alpha: self.alpha,
            phi,
        })
    }
}

impl LdaModel {
    pub fn vocab_size(&self) -> usize {
        self.phi.ncols()
    }

    /// Probability of `term` under `topic`.
    pub fn term_probability(&self, topic: usize, term: usize) -> Option<f64> {
        self.phi.get((topic, term)).copied()
    }
}

impl TopicModel for LdaModel {
    fn n_topics(&self) -> usize {
        self.phi.nrows()
    }

    fn document_topics(&self, document: &BagOfWords) -> Vec<(usize, f64)> {
        let vocab_size = self.vocab_size();
        let known: Vec<(usize, f64)> = document
            .iter()
            .filter(|&&(w, count)| w < vocab_size && count > 0)
            .map(|&(w, count)| (w, count as f64))
            .collect();
        if known.is_empty() {
            return Vec::new();
        }

        let k = self.n_topics();
        let mut theta: Array1<f64> = Array1::from_elem(k, 1.0 / k as f64);
        for _ in 0..INFERENCE_ITERATIONS {
            let mut next: Array1<f64> = Array1::from_elem(k, self.alpha);
            for &(w, count) in &known {
                let responsibility = &self.phi.column(w) * &theta;
                let norm = responsibility.sum();
                if norm <= 0.0 {
                    continue;
                }
                next.scaled_add(count / norm, &responsibility);
            }
            let total = next.sum();
            theta = next / total;
        }

        let mut weights: Vec<(usize, f64)> = theta
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, weight)| weight >= MIN_TOPIC_WEIGHT)
            .collect();
        weights.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        weights
    }

    fn topic_terms(&self, topic: usize, top_n: usize) -> Result<Vec<(usize, f64)>, TopicError> {
        if topic >= self.n_topics() {
            return Err(TopicError::UnknownTopic {
                topic,
                n_topics: self.n_topics(),
            });
        }
        let row = self.phi.row(topic);
        let mut terms: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
        terms.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        terms.truncate(top_n);
        Ok(terms)
    }
}
