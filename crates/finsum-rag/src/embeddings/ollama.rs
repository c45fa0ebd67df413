//! Ollama `/api/embed` client.

use serde::{Deserialize, Serialize};

use super::{char_len, Embedder};
use crate::error::EmbeddingError;
use crate::vector::TextVector;

/// Embeddings from a local Ollama server (e.g. `nomic-embed-text`).
pub struct OllamaEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    /// Create an embedder for `model` served at `base_url`.
    ///
    /// `dimension` is the vector length the model is expected to return;
    /// responses of any other length are rejected.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str, model: &str, dimension: usize) -> Self {
        Self {
            client,
            url: format!("{}/api/embed", base_url.trim_end_matches('/')),
            model: model.to_string(),
            dimension,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, text: &str) -> Result<TextVector, EmbeddingError> {
        let text_len = char_len(text);
        let request = EmbedRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|source| EmbeddingError::Http { text_len, source })?;

        if !response.status().is_success() {
            return Err(EmbeddingError::Status {
                status: response.status().as_u16(),
                text_len,
            });
        }

        let body: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::Malformed {
                    text_len,
                    reason: e.to_string(),
                })?;

        let mut embeddings = body.embeddings.into_iter();
        let (Some(values), None) = (embeddings.next(), embeddings.next()) else {
            return Err(EmbeddingError::Malformed {
                text_len,
                reason: "expected exactly one embedding".to_string(),
            });
        };

        if values.len() != self.dimension {
            return Err(EmbeddingError::Dimension {
                expected: self.dimension,
                actual: values.len(),
                text_len,
            });
        }

        TextVector::new(values).ok_or(EmbeddingError::NonFinite { text_len })
    }
}

impl Embedder for OllamaEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<TextVector, EmbeddingError> {
        if text.trim().is_empty() {
            return Ok(TextVector::zeros(self.dimension));
        }
        tracing::debug!(model = %self.model, chars = char_len(text), "requesting embedding");
        self.request(text).await
    }
}
