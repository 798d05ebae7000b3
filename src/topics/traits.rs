// Topic model traits — swap-ready abstraction.
//
// The analyzer only talks to these traits, so the bundled Gibbs sampler can be
// replaced by another probabilistic backend without touching the rest of the
// pipeline.

use super::vectorizer::BagOfWords;
use crate::error::TopicError;

/// Minimum weight for a topic to be reported for a document.
pub const MIN_TOPIC_WEIGHT: f64 = 0.01;

/// Something that can fit a topic model to a vectorized corpus.
pub trait TopicBackend {
    type Model: TopicModel;

    fn fit(
        &self,
        corpus: &[BagOfWords],
        vocab_size: usize,
        n_topics: usize,
        seed: Option<u64>,
    ) -> Result<Self::Model, TopicError>;
}

/// A fitted topic model.
pub trait TopicModel {
    fn n_topics(&self) -> usize;

    /// Topic weights for a document, heaviest first, omitting weights below
    /// `MIN_TOPIC_WEIGHT`. Empty for a document with no known terms.
    fn document_topics(&self, document: &BagOfWords) -> Vec<(usize, f64)>;

    /// The `top_n` most probable `(term_id, probability)` pairs of a topic.
    fn topic_terms(&self, topic: usize, top_n: usize) -> Result<Vec<(usize, f64)>, TopicError>;

    /// The single most likely topic, or `None` when nothing can be assigned.
    fn assign(&self, document: &BagOfWords) -> Option<usize> {
        self.document_topics(document).first().map(|&(topic, _)| topic)
    }
}
