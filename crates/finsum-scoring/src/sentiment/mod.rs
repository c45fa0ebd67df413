//! Three-way sentiment scoring: positive, negative, neutral.

mod lexicon;
mod tei;

use std::future::Future;

use serde::Serialize;

pub use lexicon::LexiconClassifier;
pub use tei::TeiClassifier;

use crate::error::ScoringError;

/// Inputs are cut to this many characters before classification.
///
/// Long texts destabilise the classifier more than the lost tail costs, so
/// the cap is deliberate and lossy.
pub const MAX_SENTIMENT_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Canonical label order. Logits and ties follow it.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw classifier output, one logit per label in [`SentimentLabel::ALL`] order.
pub type Logits = [f32; 3];

/// Produces sentiment logits for a text.
pub trait SentimentClassifier: Send + Sync {
    fn logits(&self, text: &str) -> impl Future<Output = Result<Logits, ScoringError>> + Send;
}

/// Runtime-selected classifier.
pub enum ClassifierBackend {
    Lexicon(LexiconClassifier),
    Tei(TeiClassifier),
}

impl SentimentClassifier for ClassifierBackend {
    async fn logits(&self, text: &str) -> Result<Logits, ScoringError> {
        match self {
            ClassifierBackend::Lexicon(c) => c.logits(text).await,
            ClassifierBackend::Tei(c) => c.logits(text).await,
        }
    }
}

/// Softmax probabilities over the three labels. Always sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScores {
    /// Numerically stable softmax of `logits`.
    fn from_logits(logits: Logits) -> Self {
        let max = logits
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        let exps = logits.map(|l| f64::from(l - max).exp());
        let total: f64 = exps.iter().sum();
        Self {
            positive: exps[0] / total,
            negative: exps[1] / total,
            neutral: exps[2] / total,
        }
    }

    #[must_use]
    pub fn get(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    /// Label with the highest probability; ties go to the earlier label.
    #[must_use]
    pub fn argmax(&self) -> SentimentLabel {
        let mut best = SentimentLabel::ALL[0];
        for label in &SentimentLabel::ALL[1..] {
            if self.get(*label) > self.get(best) {
                best = *label;
            }
        }
        best
    }

    /// `(label, probability)` pairs in canonical order.
    #[must_use]
    pub fn pairs(&self) -> [(SentimentLabel, f64); 3] {
        SentimentLabel::ALL.map(|label| (label, self.get(label)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub scores: SentimentScores,
}

/// Truncates input, classifies it, and normalises the logits.
pub struct SentimentScorer<C> {
    classifier: C,
}

impl<C: SentimentClassifier> SentimentScorer<C> {
    #[must_use]
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Score `text`, looking only at its first [`MAX_SENTIMENT_CHARS`] characters.
    ///
    /// # Errors
    ///
    /// Propagates classifier failures, and returns
    /// [`ScoringError::NonFiniteLogits`] if the classifier emits NaN or infinity.
    pub async fn score(&self, text: &str) -> Result<SentimentResult, ScoringError> {
        let input = truncate_chars(text, MAX_SENTIMENT_CHARS);
        if input.len() < text.len() {
            tracing::debug!(
                kept_chars = MAX_SENTIMENT_CHARS,
                "sentiment input truncated"
            );
        }

        let logits = self.classifier.logits(input).await?;
        if logits.iter().any(|l| !l.is_finite()) {
            return Err(ScoringError::NonFiniteLogits);
        }

        let scores = SentimentScores::from_logits(logits);
        Ok(SentimentResult {
            label: scores.argmax(),
            scores,
        })
    }
}

/// Longest prefix of `text` with at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
