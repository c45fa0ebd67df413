//! TEI (Text Embeddings Inference) `/predict` client for sequence classifiers
//! such as `yiyanghkust/finbert-tone`.

use serde::{Deserialize, Serialize};

use super::{Logits, SentimentClassifier, SentimentLabel};
use crate::error::ScoringError;

/// TEI HTTP client for a three-label sentiment model.
pub struct TeiClassifier {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
    raw_scores: bool,
    truncate: bool,
}

#[derive(Deserialize)]
struct Prediction {
    label: String,
    score: f32,
}

impl TeiClassifier {
    #[must_use]
    pub fn new(client: reqwest::Client, tei_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/predict", tei_url.trim_end_matches('/')),
        }
    }

    /// Request raw (pre-softmax) scores and reorder them into label order.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Http`] on network failure,
    /// [`ScoringError::Status`] on a non-2xx response,
    /// [`ScoringError::Malformed`] if the body cannot be parsed, and
    /// [`ScoringError::MissingLabel`] if any of the three labels is absent.
    pub async fn predict(&self, text: &str) -> Result<Logits, ScoringError> {
        let request = PredictRequest {
            inputs: text,
            raw_scores: true,
            truncate: true,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(ScoringError::Status(response.status().as_u16()));
        }

        let predictions: Vec<Prediction> = response
            .json()
            .await
            .map_err(|e| ScoringError::Malformed(format!("TEI response parse error: {e}")))?;

        logits_from_predictions(&predictions)
    }
}

fn logits_from_predictions(predictions: &[Prediction]) -> Result<Logits, ScoringError> {
    let mut logits = [0.0_f32; 3];
    for (slot, label) in logits.iter_mut().zip(SentimentLabel::ALL) {
        let prediction = predictions
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(label.as_str()))
            .ok_or_else(|| ScoringError::MissingLabel(label.as_str().to_string()))?;
        *slot = prediction.score;
    }
    Ok(logits)
}

impl SentimentClassifier for TeiClassifier {
    async fn logits(&self, text: &str) -> Result<Logits, ScoringError> {
        self.predict(text).await
    }
}
