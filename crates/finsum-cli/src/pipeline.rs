//! Article analysis orchestration.
//!
//! Startup builds one [`PipelineContext`] from [`AppConfig`]; each article is
//! then run through retrieve, prompt, generate, and the two scorers. Retrieval
//! and generation failures abort the request. Scoring failures degrade to an
//! `unknown` sentiment or a missing bias verdict.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use finsum_core::{
    load_bias_keywords, load_knowledge_base, AppConfig, BiasKeywords, ConfigError, EmbedderKind,
    KnowledgeBase, SentimentBackend,
};
use finsum_rag::{
    build_prompt, Embedder, EmbedderBackend, GenerationError, HashingEmbedder, OllamaChatClient,
    OllamaEmbedder, RetrievalError, Retriever, TextGenerator, VectorIndex,
};
use finsum_scoring::{
    BiasReport, BiasScorer, ClassifierBackend, LexiconClassifier, SentimentClassifier,
    SentimentResult, SentimentScorer, TeiClassifier,
};

/// Failures that stop a request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("retrieval failed")]
    Retrieval(#[from] RetrievalError),

    #[error("summary generation failed")]
    Generation(#[from] GenerationError),
}

/// Immutable handles shared by every request.
pub struct PipelineContext<E, G, C> {
    pub embedder: E,
    pub index: VectorIndex,
    pub generator: G,
    pub sentiment: SentimentScorer<C>,
    pub bias: BiasScorer,
    pub top_k: usize,
}

/// Context wired to the configured backends.
pub type LiveContext = PipelineContext<EmbedderBackend, OllamaChatClient, ClassifierBackend>;

impl LiveContext {
    /// Build every backend named by `config` and index the knowledge base.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if a data file cannot be loaded, the HTTP
    /// client cannot be built, or a knowledge-base passage fails to embed.
    pub async fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let client = http_client(config)?;
        let embedder = build_embedder(config, client.clone());
        let index = build_index(config, &embedder).await?;
        let generator = OllamaChatClient::new(client.clone(), &config.ollama_url, &config.chat_model);
        let sentiment = SentimentScorer::new(build_classifier(config, client)?);
        let bias = build_bias_scorer(config)?;

        tracing::info!(
            embedder = %config.embedder,
            sentiment_backend = %config.sentiment_backend,
            chat_model = %config.chat_model,
            top_k = config.top_k,
            "pipeline ready"
        );

        Ok(Self {
            embedder,
            index,
            generator,
            sentiment,
            bias,
            top_k: config.top_k,
        })
    }
}

/// Shared HTTP client for every outbound service.
///
/// # Errors
///
/// Returns [`PipelineError::Client`] if the TLS backend fails to initialise.
pub fn http_client(config: &AppConfig) -> Result<reqwest::Client, PipelineError> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("finsum/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(PipelineError::Client)
}

#[must_use]
pub fn build_embedder(config: &AppConfig, client: reqwest::Client) -> EmbedderBackend {
    match config.embedder {
        EmbedderKind::Hashing => {
            EmbedderBackend::Hashing(HashingEmbedder::new(config.embed_dimension))
        }
        EmbedderKind::Ollama => EmbedderBackend::Ollama(OllamaEmbedder::new(
            client,
            &config.ollama_url,
            &config.embed_model,
            config.embed_dimension,
        )),
    }
}

/// Knowledge base from `FINSUM_KNOWLEDGE_BASE_PATH`, or the built-in corpus.
///
/// # Errors
///
/// Returns [`ConfigError`] if the configured file cannot be loaded.
pub fn load_corpus(config: &AppConfig) -> Result<KnowledgeBase, ConfigError> {
    match &config.knowledge_base_path {
        Some(path) => load_knowledge_base(path),
        None => Ok(KnowledgeBase::default()),
    }
}

/// # Errors
///
/// Returns [`PipelineError`] if the corpus cannot be loaded or embedded.
pub async fn build_index<E: Embedder>(
    config: &AppConfig,
    embedder: &E,
) -> Result<VectorIndex, PipelineError> {
    let corpus = load_corpus(config)?;
    Ok(VectorIndex::build(embedder, &corpus.passages).await?)
}

/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] if the TEI backend is selected
/// without a URL.
pub fn build_classifier(
    config: &AppConfig,
    client: reqwest::Client,
) -> Result<ClassifierBackend, ConfigError> {
    match config.sentiment_backend {
        SentimentBackend::Lexicon => Ok(ClassifierBackend::Lexicon(LexiconClassifier::new())),
        SentimentBackend::Tei => {
            let url = config
                .tei_url
                .as_deref()
                .ok_or_else(|| ConfigError::MissingEnvVar("FINSUM_TEI_URL".to_string()))?;
            Ok(ClassifierBackend::Tei(TeiClassifier::new(client, url)))
        }
    }
}

/// # Errors
///
/// Returns [`ConfigError`] if the configured keyword file cannot be loaded.
pub fn build_bias_scorer(config: &AppConfig) -> Result<BiasScorer, ConfigError> {
    let keywords = match &config.bias_keywords_path {
        Some(path) => load_bias_keywords(path)?,
        None => BiasKeywords::default(),
    };
    Ok(BiasScorer::new(&keywords))
}

/// Sentiment as reported to the user. `label` is `"unknown"` and `scores`
/// empty when scoring failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentView {
    pub label: String,
    pub scores: BTreeMap<String, f64>,
}

impl SentimentView {
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            label: "unknown".to_string(),
            scores: BTreeMap::new(),
        }
    }
}

impl From<SentimentResult> for SentimentView {
    fn from(result: SentimentResult) -> Self {
        Self {
            label: result.label.to_string(),
            scores: result
                .scores
                .pairs()
                .into_iter()
                .map(|(label, p)| (label.to_string(), p))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleAnalysis {
    pub article: String,
    pub summary: String,
    /// Passages folded into the generation prompt, best first.
    pub context_passages: Vec<String>,
    pub sentiment: SentimentView,
    /// `None` when bias scoring failed.
    pub bias: Option<BiasReport>,
    /// Knowledge-base passages closest to the summary itself.
    pub related: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Run one article through the full pipeline.
///
/// # Errors
///
/// Returns [`PipelineError::Retrieval`] if the article cannot be embedded or
/// queried, and [`PipelineError::Generation`] if the summary request fails.
/// Sentiment, bias and related-passage failures are logged and degraded.
pub async fn analyze_article<E, G, C>(
    ctx: &PipelineContext<E, G, C>,
    article: &str,
) -> Result<ArticleAnalysis, PipelineError>
where
    E: Embedder,
    G: TextGenerator,
    C: SentimentClassifier,
{
    let retriever = Retriever::new(&ctx.embedder, &ctx.index);

    let context_passages = retriever.retrieve(article, ctx.top_k).await?;
    let prompt = build_prompt(article, &context_passages);
    let summary = ctx.generator.generate(&prompt).await?;

    let sentiment = match ctx.sentiment.score(&summary).await {
        Ok(result) => SentimentView::from(result),
        Err(e) => {
            tracing::warn!(error = %e, "sentiment scoring failed; degrading");
            SentimentView::unknown()
        }
    };

    let bias = match ctx.bias.score(&summary) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!(error = %e, "bias scoring failed; omitting verdict");
            None
        }
    };

    let related = match retriever.retrieve(&summary, ctx.top_k).await {
        Ok(passages) => passages,
        Err(e) => {
            tracing::warn!(error = %e, "related passage lookup failed");
            Vec::new()
        }
    };

    tracing::info!(
        article_chars = article.chars().count(),
        summary_chars = summary.chars().count(),
        sentiment = %sentiment.label,
        bias = ?bias.map(|b| b.verdict),
        "article analyzed"
    );

    Ok(ArticleAnalysis {
        article: article.to_string(),
        summary,
        context_passages,
        sentiment,
        bias,
        related,
        analyzed_at: Utc::now(),
    })
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
