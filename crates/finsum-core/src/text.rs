//! Word tokenizer shared by the hashing embedder and the TF-IDF bias scorer.

use std::sync::LazyLock;

use regex::Regex;

/// Words of two or more word characters; single letters and punctuation drop out.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Split `text` into lowercase tokens, in order of appearance.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
