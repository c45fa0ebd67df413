use thiserror::Error;

/// Failure turning text into a vector.
///
/// Every variant records the length (in characters) of the text that was
/// being embedded so callers can tell oversized inputs from service faults.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed for text of {text_len} chars: {source}")]
    Http {
        text_len: usize,
        #[source]
        source: reqwest::Error,
    },

    #[error("embedding service returned status {status} for text of {text_len} chars")]
    Status { status: u16, text_len: usize },

    #[error("malformed embedding response for text of {text_len} chars: {reason}")]
    Malformed { text_len: usize, reason: String },

    #[error("expected a {expected}-dimensional embedding, got {actual} (text of {text_len} chars)")]
    Dimension {
        expected: usize,
        actual: usize,
        text_len: usize,
    },

    #[error("embedding contains NaN or infinite components (text of {text_len} chars)")]
    NonFinite { text_len: usize },
}

impl EmbeddingError {
    /// Length in characters of the text whose embedding failed.
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            EmbeddingError::Http { text_len, .. }
            | EmbeddingError::Status { text_len, .. }
            | EmbeddingError::Malformed { text_len, .. }
            | EmbeddingError::Dimension { text_len, .. }
            | EmbeddingError::NonFinite { text_len } => *text_len,
        }
    }
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("query vector has dimension {query} but the index was built with dimension {index}")]
    DimensionMismatch { index: usize, query: usize },

    #[error("passage {id} embedded to dimension {actual}, expected {expected}")]
    InconsistentCorpus {
        id: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed generation response: {0}")]
    Malformed(String),
}
