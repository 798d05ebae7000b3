// Unit tests for the tokenizer.
//
// Covers normalization, punctuation stripping, stop word removal, the bigram
// asymmetry for n_gram > 2, and the quote-parsing fallback.

use std::sync::Arc;

use issuelens::topics::lexicon::{Lemmatizer, Lexicon};
use issuelens::topics::tokenizer::{Tokenizer, TokenizerConfig, STRIPPED_CHARS};

fn small_lexicon() -> Arc<Lexicon> {
    Arc::new(Lexicon::new(["the", "a", "is", "on"], Lemmatizer::identity()))
}

fn tokenizer(n_gram: usize, ignore_quotes: bool) -> Tokenizer {
    Tokenizer::new(
        TokenizerConfig {
            n_gram,
            ignore_quotes,
        },
        small_lexicon(),
    )
    .unwrap()
}

// ============================================================
// Normalization
// ============================================================

#[test]
fn lowercases_and_drops_apostrophes() {
    let tok = tokenizer(1, true);
    assert_eq!(tok.tokenize("IDE Doesn't Start"), vec!["ide", "doesnt", "start"]);
}

#[test]
fn strips_punctuation_without_splitting() {
    let tok = tokenizer(1, true);
    assert_eq!(
        tok.tokenize("NPE: (in) file_manager.kt!"),
        vec!["npe", "in", "filemanagerkt"]
    );
}

#[test]
fn consecutive_spaces_produce_no_empty_tokens() {
    let tok = tokenizer(1, true);
    assert_eq!(tok.tokenize("  crash   on   start  "), vec!["crash", "start"]);
}

#[test]
fn only_spaces_split_when_ignoring_quotes() {
    let tok = tokenizer(1, true);
    // Tabs are not separators in plain space splitting
    assert_eq!(tok.tokenize("crash\tfreeze"), vec!["crash\tfreeze"]);
}

#[test]
fn input_with_no_survivors_is_empty() {
    let tok = tokenizer(1, true);
    assert!(tok.tokenize("").is_empty());
    assert!(tok.tokenize("the a is --- ...").is_empty());
}

#[test]
fn output_has_no_stripped_chars_or_stopwords() {
    let tok = tokenizer(1, true);
    let lexicon = small_lexicon();
    let text = "The [debugger] hangs on a *big* project -- see #1234, @user & {config}: /tmp/x…";
    for token in tok.tokenize(text) {
        assert!(!token.is_empty());
        assert!(
            !token.chars().any(|c| STRIPPED_CHARS.contains(&c)),
            "token {token:?} contains a stripped character"
        );
        assert!(!lexicon.is_stopword(&token), "stopword {token:?} survived");
    }
}

#[test]
fn tokenize_is_deterministic() {
    let tok = tokenizer(2, false);
    let text = r#"Gradle sync "fails silently" after update"#;
    assert_eq!(tok.tokenize(text), tok.tokenize(text));
}

// ============================================================
// N-grams
// ============================================================

#[test]
fn bigrams_join_adjacent_tokens() {
    let tok = tokenizer(2, true);
    assert_eq!(tok.tokenize("a b c"), vec!["b c"]);
    let lexicon = Arc::new(Lexicon::new(Vec::<String>::new(), Lemmatizer::identity()));
    let tok = Tokenizer::new(
        TokenizerConfig {
            n_gram: 2,
            ignore_quotes: true,
        },
        lexicon,
    )
    .unwrap();
    assert_eq!(tok.tokenize("a b c"), vec!["a b", "b c"]);
}

#[test]
fn n_gram_above_two_still_produces_bigrams() {
    let text = "kotlin gradle plugin crash";
    assert_eq!(tokenizer(3, true).tokenize(text), tokenizer(2, true).tokenize(text));
    assert_eq!(tokenizer(5, true).tokenize(text).len(), 3);
}

#[test]
fn single_token_yields_no_bigrams() {
    assert!(tokenizer(2, true).tokenize("crash").is_empty());
}

// ============================================================
// Quote handling
// ============================================================

#[test]
fn quoted_phrase_is_one_token() {
    let tok = tokenizer(1, false);
    assert_eq!(
        tok.tokenize(r#"error in "find usages" dialog"#),
        vec!["error", "in", "find usages", "dialog"]
    );
}

#[test]
fn malformed_quotes_never_fail() {
    let tok = tokenizer(1, false);
    assert_eq!(
        tok.tokenize(r#"say "hello world"#),
        vec!["say", "hello", "world"]
    );
    assert_eq!(tok.tokenize("ends with \\"), vec!["ends", "with"]);
}

// ============================================================
// English lexicon
// ============================================================

#[test]
fn english_lexicon_removes_common_words_and_lemmatizes() {
    let tok = Tokenizer::new(TokenizerConfig::default(), Arc::new(Lexicon::english())).unwrap();
    let tokens = tok.tokenize("The debugger and the Gradle plugins");
    assert!(!tokens.contains(&"the".to_string()));
    assert!(!tokens.contains(&"and".to_string()));
    assert!(tokens.contains(&"debugger".to_string()));
    assert!(tokens.contains(&"gradle".to_string()));
    assert!(tokens.contains(&"plugin".to_string()));
}

#[test]
fn english_lexicon_keeps_domain_vocabulary() {
    let lexicon = Lexicon::english();
    for word in ["test", "run", "open", "new", "value", "line", "case", "system", "problem"] {
        assert!(!lexicon.is_stopword(word), "{word} should not be a stop word");
    }
    assert!(lexicon.is_stopword("the"));
    assert!(lexicon.is_stopword("should"));

    let tok = Tokenizer::new(TokenizerConfig::default(), Arc::new(lexicon)).unwrap();
    assert_eq!(
        tok.tokenize("Run configuration test fails to open new project file"),
        vec!["run", "configuration", "test", "fail", "open", "new", "project", "file"]
    );
}
