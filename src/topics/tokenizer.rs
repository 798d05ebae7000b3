// Rule-based tokenizer: normalize, segment, clean, lemmatize, optionally pair.
//
// The same tokenizer feeds both the frequency models and the count vectorizer
// behind topic modeling, so its output must be deterministic for a given
// configuration and lexicon.

use std::sync::Arc;

use tracing::warn;

use super::lexicon::Lexicon;
use crate::error::ConfigError;

/// Characters removed from every raw token (removed, not split on).
pub const STRIPPED_CHARS: &[char] = &[
    '"', '`', '!', '?', '[', '|', ']', '(', ')', '-', '=', '\\', '>', '.', '_', '%', '$', '#',
    '*', '+', ',', '@', '<', '&', '“', '…', '{', '}', '—', ':', '/',
];

/// Tokenizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// 1 for single words; anything larger produces adjacent word pairs.
    pub n_gram: usize,
    /// Split on plain spaces instead of honoring shell-style quoting.
    pub ignore_quotes: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            n_gram: 1,
            ignore_quotes: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
    lexicon: Arc<Lexicon>,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig, lexicon: Arc<Lexicon>) -> Result<Self, ConfigError> {
        if config.n_gram == 0 {
            return Err(ConfigError::InvalidNGram);
        }
        if config.n_gram > 2 {
            warn!(
                n_gram = config.n_gram,
                "n-grams longer than 2 are not supported, producing bigrams"
            );
        }
        Ok(Self { config, lexicon })
    }

    pub fn config(&self) -> TokenizerConfig {
        self.config
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Turn raw text into clean tokens (or bigrams, when configured).
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = preprocess(text);

        let raw = if self.config.ignore_quotes {
            split_on_spaces(&text)
        } else {
            // Unbalanced quoting falls back to plain splitting
            split_shell_words(&text).unwrap_or_else(|_| split_on_spaces(&text))
        };

        let tokens = self.postprocess(raw);
        make_n_grams(tokens, self.config.n_gram)
    }

    fn postprocess(&self, raw: Vec<String>) -> Vec<String> {
        raw.into_iter()
            .map(|token| strip_punctuation(&token))
            .filter(|token| !token.is_empty() && !self.lexicon.is_stopword(token))
            .map(|token| self.lexicon.lemmatize(&token).into_owned())
            .collect()
    }
}

fn preprocess(text: &str) -> String {
    text.replace('\'', "").to_lowercase()
}

fn strip_punctuation(token: &str) -> String {
    token.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect()
}

fn split_on_spaces(text: &str) -> Vec<String> {
    text.split(' ').map(str::to_string).collect()
}

fn make_n_grams(tokens: Vec<String>, n_gram: usize) -> Vec<String> {
    if n_gram == 1 {
        return tokens;
    }
    // Only pairs are built, whatever n_gram > 1 was requested
    tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteError {
    UnclosedQuote(char),
    TrailingEscape,
}

/// POSIX shell-style word splitting.
///
/// ASCII space, tab, CR and LF separate words. Single quotes are literal,
/// inside double quotes only `\\` and `\"` are escapes, and a backslash outside
/// quotes escapes the next character. Quotes themselves are dropped.
fn split_shell_words(text: &str) -> Result<Vec<String>, QuoteError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => return Err(QuoteError::UnclosedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('\\' | '"')) => current.push(escaped),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(QuoteError::UnclosedQuote('"')),
                        },
                        Some(inner) => current.push(inner),
                        None => return Err(QuoteError::UnclosedQuote('"')),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err(QuoteError::TrailingEscape),
                }
            }
            other => {
                in_word = true;
                current.push(other);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}
