//! Text embedders.
//!
//! [`Embedder`] is the seam between retrieval and whatever produces vectors.
//! Two backends ship: [`OllamaEmbedder`] calls a local Ollama server, and
//! [`HashingEmbedder`] is an offline feature-hashing model used in tests and
//! when no embedding server is available.

mod hashing;
mod ollama;

use std::future::Future;

pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;

use crate::error::EmbeddingError;
use crate::vector::TextVector;

/// Maps text to a fixed-dimension vector.
///
/// Implementations must be deterministic for a fixed model state and must
/// return the zero vector (not an error) for empty or whitespace-only text.
pub trait Embedder: Send + Sync {
    /// Length of every vector this embedder produces.
    fn dimension(&self) -> usize;

    /// Embed one text.
    fn embed(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<TextVector, EmbeddingError>> + Send;
}

/// Runtime-selected embedder.
pub enum EmbedderBackend {
    Hashing(HashingEmbedder),
    Ollama(OllamaEmbedder),
}

impl Embedder for EmbedderBackend {
    fn dimension(&self) -> usize {
        match self {
            EmbedderBackend::Hashing(e) => e.dimension(),
            EmbedderBackend::Ollama(e) => e.dimension(),
        }
    }

    async fn embed(&self, text: &str) -> Result<TextVector, EmbeddingError> {
        match self {
            EmbedderBackend::Hashing(e) => e.embed(text).await,
            EmbedderBackend::Ollama(e) => e.embed(text).await,
        }
    }
}

/// Character count used in error reports.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
