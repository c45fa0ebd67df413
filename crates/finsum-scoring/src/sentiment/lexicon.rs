//! Finance-domain lexicon classifier.

use finsum_core::tokenize;

use super::{Logits, SentimentClassifier};
use crate::error::ScoringError;

/// Domain-specific word weights.
///
/// Keys are lowercase single words. Positive values feed the positive logit,
/// negative values (by magnitude) feed the negative logit.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("gain", 0.4),
    ("gains", 0.4),
    ("rally", 0.5),
    ("rallied", 0.5),
    ("surge", 0.4),
    ("surged", 0.4),
    ("growth", 0.4),
    ("strong", 0.3),
    ("beat", 0.4),
    ("record", 0.3),
    ("profit", 0.4),
    ("profits", 0.4),
    ("higher", 0.3),
    ("upgrade", 0.5),
    ("optimism", 0.5),
    ("recovery", 0.4),
    ("boost", 0.4),
    ("outperform", 0.5),
    ("expansion", 0.3),
    ("better", 0.3),
    // Negative signals
    ("loss", -0.5),
    ("losses", -0.5),
    ("decline", -0.5),
    ("fell", -0.4),
    ("crash", -0.8),
    ("recession", -0.7),
    ("inflation", -0.3),
    ("hike", -0.4),
    ("concern", -0.3),
    ("concerns", -0.3),
    ("risk", -0.3),
    ("volatility", -0.4),
    ("downgrade", -0.5),
    ("layoffs", -0.6),
    ("slump", -0.6),
    ("plunge", -0.7),
    ("plunged", -0.7),
    ("crackdown", -0.5),
    ("crackdowns", -0.5),
    ("stalled", -0.4),
    ("tensions", -0.4),
    ("uncertainty", -0.4),
    ("default", -0.6),
    ("bankruptcy", -0.8),
    ("weak", -0.4),
    ("selloff", -0.6),
    ("fears", -0.5),
];

/// Logit given to `neutral`. Text needs more than this much evidence on one
/// side before it stops reading as neutral.
const NEUTRAL_PRIOR: f32 = 0.5;

/// Offline classifier: sums lexicon weights into positive and negative logits.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Summed positive and (absolute) negative evidence in `text`.
    #[must_use]
    pub fn tally(text: &str) -> (f32, f32) {
        let mut positive = 0.0_f32;
        let mut negative = 0.0_f32;
        for word in tokenize(text) {
            if let Some(&(_, weight)) = LEXICON.iter().find(|(w, _)| *w == word) {
                if weight > 0.0 {
                    positive += weight;
                } else {
                    negative -= weight;
                }
            }
        }
        (positive, negative)
    }

    #[must_use]
    pub fn classify(text: &str) -> Logits {
        let (positive, negative) = Self::tally(text);
        [positive, negative, NEUTRAL_PRIOR]
    }
}

impl SentimentClassifier for LexiconClassifier {
    async fn logits(&self, text: &str) -> Result<Logits, ScoringError> {
        Ok(Self::classify(text))
    }
}
