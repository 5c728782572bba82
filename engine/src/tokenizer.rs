use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").expect("valid regex");
}

/// Tokenize text into lowercased word-character runs.
///
/// Anything outside `\w` (alphanumerics and underscore) delimits tokens, so
/// leading/trailing punctuation is dropped and no empty tokens are produced.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}
