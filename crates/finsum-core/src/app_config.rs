use std::path::PathBuf;

/// Which embedder turns text into vectors for retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Remote embeddings from a local Ollama server.
    Ollama,
    /// Offline feature-hashing embedder.
    Hashing,
}

impl std::fmt::Display for EmbedderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbedderKind::Ollama => write!(f, "ollama"),
            EmbedderKind::Hashing => write!(f, "hashing"),
        }
    }
}

impl EmbedderKind {
    /// Vector length used when `FINSUM_EMBED_DIMENSION` is not set.
    ///
    /// 768 matches `nomic-embed-text`; 384 keeps the hashing space small
    /// enough to stay cheap while collisions remain rare for short passages.
    #[must_use]
    pub fn default_dimension(self) -> usize {
        match self {
            EmbedderKind::Ollama => 768,
            EmbedderKind::Hashing => 384,
        }
    }
}

/// Which classifier produces sentiment logits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBackend {
    /// Built-in finance lexicon; no network access.
    Lexicon,
    /// Sequence-classification model served by Text Embeddings Inference.
    Tei,
}

impl std::fmt::Display for SentimentBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentBackend::Lexicon => write!(f, "lexicon"),
            SentimentBackend::Tei => write!(f, "tei"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub ollama_url: String,
    pub chat_model: String,
    pub embedder: EmbedderKind,
    pub embed_model: String,
    pub embed_dimension: usize,
    pub sentiment_backend: SentimentBackend,
    pub tei_url: Option<String>,
    pub top_k: usize,
    /// `None` means requests block until the service answers or fails.
    pub request_timeout_secs: Option<u64>,
    pub knowledge_base_path: Option<PathBuf>,
    pub bias_keywords_path: Option<PathBuf>,
}
