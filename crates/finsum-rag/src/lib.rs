//! Retrieval-augmented context pipeline for financial news summaries.
//!
//! Embeds text into fixed-length vectors, ranks knowledge-base passages by
//! cosine similarity, folds the best matches into a grounded prompt, and sends
//! that prompt to a local Ollama chat model.

pub mod embeddings;
pub mod error;
pub mod generation;
pub mod index;
pub mod prompt;
pub mod retriever;
pub mod vector;

pub use embeddings::{Embedder, EmbedderBackend, HashingEmbedder, OllamaEmbedder};
pub use error::{EmbeddingError, GenerationError, RetrievalError};
pub use generation::{OllamaChatClient, TextGenerator};
pub use index::{Passage, ScoredPassage, VectorIndex};
pub use prompt::build_prompt;
pub use retriever::Retriever;
pub use vector::{cosine_similarity, TextVector};
