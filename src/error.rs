// Typed errors for the library surface.
//
// The binary wraps these in anyhow; callers of the library can match on the
// variants to tell a bad input file apart from a bad model configuration.

use thiserror::Error;

/// Failures while turning source records into an `IssueRepository`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read issue source: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, a missing required field, or a field of the wrong type.
    #[error("line {line}: invalid issue record: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: `created` is not an integer timestamp: {value}")]
    InvalidTimestamp { line: usize, value: String },
}

impl LoadError {
    /// The 1-based source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Io(_) => None,
            LoadError::Json { line, .. } | LoadError::InvalidTimestamp { line, .. } => Some(*line),
        }
    }
}

/// Rejected construction parameters for tokenizers and models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("n_gram must be at least 1")]
    InvalidNGram,

    #[error("n_words must be at least 1")]
    InvalidWordCount,

    #[error("min_freq ({min_freq}) is greater than max_freq ({max_freq})")]
    InvalidFrequencyBand { min_freq: f64, max_freq: f64 },

    #[error("frequency bound {0} is outside [0, 1]")]
    FrequencyOutOfRange(f64),
}

/// Errors from fitting or querying a topic model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopicError {
    #[error("Number of topics must be positive")]
    InvalidTopicCount,

    #[error("No documents to fit")]
    EmptyCorpus,

    #[error("Vocabulary is empty, every document tokenized to nothing")]
    EmptyVocabulary,

    #[error("Topic model not fitted yet")]
    NotFitted,

    #[error("Topic {topic} out of range (model has {n_topics} topics)")]
    UnknownTopic { topic: usize, n_topics: usize },
}
