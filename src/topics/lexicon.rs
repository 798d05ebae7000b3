// Shared linguistic resources: the stop word list and the lemmatizer.
//
// A Lexicon is built once at startup and handed to every Tokenizer behind an
// Arc. Nothing here is a lazily initialized global, so tests can build a
// lexicon with a tiny custom stop word list and get fully predictable output.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use stop_words::{get, LANGUAGE};
use tracing::debug;

/// Immutable stop word set plus lemmatizer.
#[derive(Debug, Clone)]
pub struct Lexicon {
    stopwords: HashSet<String>,
    lemmatizer: Lemmatizer,
}

impl Lexicon {
    /// NLTK English stop words from the `stop-words` crate with the English noun lemmatizer.
    pub fn english() -> Self {
        let stopwords: Vec<String> = get(LANGUAGE::English);
        debug!(stopwords = stopwords.len(), "Loaded English lexicon");
        Self::new(stopwords, Lemmatizer::english())
    }

    pub fn new<I, S>(stopwords: I, lemmatizer: Lemmatizer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            lemmatizer,
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        self.lemmatizer.lemmatize(token)
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }
}

/// Irregular plurals that suffix rules would get wrong.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("indices", "index"),
    ("vertices", "vertex"),
    ("matrices", "matrix"),
    ("appendices", "appendix"),
    ("analyses", "analysis"),
    ("hypotheses", "hypothesis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("parentheses", "parenthesis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("selves", "self"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("ties", "tie"),
    ("lies", "lie"),
    ("pies", "pie"),
    ("caches", "cache"),
    ("statuses", "status"),
];

/// Words ending in `s` that are already their base form.
const INVARIANT_NOUNS: &[&str] = &[
    "news", "series", "species", "lens", "gas", "bias", "alias", "canvas", "atlas", "always",
    "perhaps", "whereas", "yes", "its", "has", "was", "does", "this", "thus", "plus", "bus",
    "os", "ios", "macos", "windows", "jns", "dns", "aws", "css", "js", "ts", "sms",
    "https", "http", "mathematics", "physics", "statistics", "analytics", "graphics",
];

/// Rule-based noun lemmatizer.
///
/// Mirrors the shape of WordNet's morphy for nouns: exceptions first, then
/// ordered suffix substitutions. There is no dictionary lookup, so words are
/// left alone unless a rule clearly applies.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
    invariant: HashSet<&'static str>,
    rules_enabled: bool,
}

impl Lemmatizer {
    pub fn english() -> Self {
        Self {
            irregular: IRREGULAR_NOUNS.iter().copied().collect(),
            invariant: INVARIANT_NOUNS.iter().copied().collect(),
            rules_enabled: true,
        }
    }

    /// A lemmatizer that returns every token unchanged.
    pub fn identity() -> Self {
        Self {
            irregular: HashMap::new(),
            invariant: HashSet::new(),
            rules_enabled: false,
        }
    }

    pub fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if !self.rules_enabled || self.invariant.contains(token) {
            return Cow::Borrowed(token);
        }
        if let Some(base) = self.irregular.get(token) {
            return Cow::Owned((*base).to_string());
        }
        if !token.chars().all(char::is_alphabetic) {
            return Cow::Borrowed(token);
        }

        let len = token.chars().count();
        if len > 4 {
            if let Some(stem) = token.strip_suffix("ies") {
                return Cow::Owned(format!("{stem}y"));
            }
        }
        if let Some(stem) = token.strip_suffix("sses") {
            return Cow::Owned(format!("{stem}ss"));
        }
        for suffix in ["xes", "ches", "shes"] {
            if len > suffix.len() + 1 {
                if let Some(stem) = token.strip_suffix(suffix) {
                    return Cow::Owned(format!("{stem}{}", &suffix[..suffix.len() - 2]));
                }
            }
        }
        if len > 3
            && token.ends_with('s')
            && !token.ends_with("ss")
            && !token.ends_with("us")
            && !token.ends_with("is")
        {
            return Cow::Borrowed(&token[..token.len() - 1]);
        }
        Cow::Borrowed(token)
    }
}
