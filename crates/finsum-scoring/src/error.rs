use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier returned status {0}")]
    Status(u16),

    #[error("malformed classifier response: {0}")]
    Malformed(String),

    #[error("classifier response has no score for label '{0}'")]
    MissingLabel(String),

    #[error("classifier produced NaN or infinite logits")]
    NonFiniteLogits,

    #[error("no terms found in the text or either keyword list")]
    EmptyVocabulary,
}
