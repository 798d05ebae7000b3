// Text analytics — tokenization, frequency ranking, and topic modeling.

pub mod analyzer;
pub mod freq;
pub mod lda;
pub mod lexicon;
pub mod naive;
pub mod tokenizer;
pub mod traits;
pub mod vectorizer;
