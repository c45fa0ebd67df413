//! Political-leaning heuristic based on keyword overlap.
//!
//! The left and right keyword lists are each joined into a pseudo-document.
//! For every call, a TF-IDF model is fitted on exactly three documents (the
//! text and the two pseudo-documents) and the text is compared to each side
//! by cosine similarity. Because the IDF weights depend on the text itself,
//! similarities are only comparable within a single call.

use std::collections::BTreeMap;

use serde::Serialize;

use finsum_core::{tokenize, BiasKeywords};

use crate::error::ScoringError;

/// Similarity gap below which a text is called `Center`.
pub const CENTER_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BiasVerdict {
    Left,
    Center,
    Right,
}

impl BiasVerdict {
    /// `Center` when the two similarities are within [`CENTER_THRESHOLD`],
    /// otherwise the strictly larger side.
    #[must_use]
    pub fn from_similarities(sim_left: f64, sim_right: f64) -> Self {
        if (sim_left - sim_right).abs() < CENTER_THRESHOLD {
            BiasVerdict::Center
        } else if sim_left > sim_right {
            BiasVerdict::Left
        } else {
            BiasVerdict::Right
        }
    }
}

impl std::fmt::Display for BiasVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BiasVerdict::Left => write!(f, "Left"),
            BiasVerdict::Center => write!(f, "Center"),
            BiasVerdict::Right => write!(f, "Right"),
        }
    }
}

/// Verdict plus the similarities that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiasReport {
    pub verdict: BiasVerdict,
    pub sim_left: f64,
    pub sim_right: f64,
}

pub struct BiasScorer {
    left_doc: String,
    right_doc: String,
}

type SparseVector = BTreeMap<String, f64>;

impl BiasScorer {
    #[must_use]
    pub fn new(keywords: &BiasKeywords) -> Self {
        Self {
            left_doc: keywords.left.join(" "),
            right_doc: keywords.right.join(" "),
        }
    }

    /// Classify `text` as Left, Center or Right.
    ///
    /// Text that shares no terms with either keyword list (including empty
    /// text) scores 0 against both and comes out `Center`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::EmptyVocabulary`] if neither the text nor the
    /// keyword lists contain a single term.
    pub fn score(&self, text: &str) -> Result<BiasReport, ScoringError> {
        let vectors = fit_transform(&[text, &self.left_doc, &self.right_doc])?;
        let sim_left = dot(&vectors[0], &vectors[1]);
        let sim_right = dot(&vectors[0], &vectors[2]);
        let verdict = BiasVerdict::from_similarities(sim_left, sim_right);

        tracing::debug!(sim_left, sim_right, %verdict, "bias scored");
        Ok(BiasReport {
            verdict,
            sim_left,
            sim_right,
        })
    }
}

/// L2-normalised TF-IDF rows for `docs`, fitted on `docs` alone.
///
/// Smoothed IDF: `ln((1 + n) / (1 + df)) + 1`, raw term counts.
fn fit_transform(docs: &[&str]) -> Result<Vec<SparseVector>, ScoringError> {
    let counts: Vec<BTreeMap<String, usize>> = docs
        .iter()
        .map(|doc| {
            let mut tf = BTreeMap::new();
            for token in tokenize(doc) {
                *tf.entry(token).or_insert(0) += 1;
            }
            tf
        })
        .collect();

    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    for tf in &counts {
        for term in tf.keys() {
            *df.entry(term.as_str()).or_insert(0) += 1;
        }
    }
    if df.is_empty() {
        return Err(ScoringError::EmptyVocabulary);
    }

    #[allow(clippy::cast_precision_loss)]
    let n = docs.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let idf = |term: &str| -> f64 {
        let d = df.get(term).copied().unwrap_or(0) as f64;
        ((1.0 + n) / (1.0 + d)).ln() + 1.0
    };

    let vectors = counts
        .iter()
        .map(|tf| {
            let mut row: SparseVector = tf
                .iter()
                .map(|(term, &count)| {
                    #[allow(clippy::cast_precision_loss)]
                    let weight = count as f64 * idf(term);
                    (term.clone(), weight)
                })
                .collect();
            let norm = row.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for w in row.values_mut() {
                    *w /= norm;
                }
            }
            row
        })
        .collect();

    Ok(vectors)
}

/// Dot product of two unit-length sparse rows, i.e. their cosine similarity.
/// A zero row gives 0.
fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    a.iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum()
}
