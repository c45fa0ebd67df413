//! Shared configuration and reference data for the finsum workspace.
//!
//! Holds the environment-driven [`AppConfig`], the knowledge-base passages
//! used for retrieval, the keyword lists behind the bias heuristic, and the
//! tokenizer both the hashing embedder and the TF-IDF scorer agree on.

pub mod app_config;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod text;

pub use app_config::{AppConfig, EmbedderKind, SentimentBackend};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use knowledge::{
    load_bias_keywords, load_knowledge_base, BiasKeywords, KnowledgeBase,
    DEFAULT_KNOWLEDGE_BASE, DEFAULT_LEFT_KEYWORDS, DEFAULT_RIGHT_KEYWORDS,
};
pub use text::tokenize;
