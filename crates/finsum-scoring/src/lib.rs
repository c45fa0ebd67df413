//! Sentiment and political-bias scoring for generated summaries.
//!
//! Sentiment comes from a pluggable three-way classifier (an offline finance
//! lexicon or a TEI-hosted model) turned into a softmax distribution. Bias is
//! a lexical heuristic: TF-IDF similarity of the text to two keyword
//! pseudo-documents.

pub mod bias;
pub mod error;
pub mod sentiment;

pub use bias::{BiasReport, BiasScorer, BiasVerdict, CENTER_THRESHOLD};
pub use error::ScoringError;
pub use sentiment::{
    ClassifierBackend, LexiconClassifier, SentimentClassifier, SentimentLabel, SentimentResult,
    SentimentScorer, SentimentScores, TeiClassifier, MAX_SENTIMENT_CHARS,
};
