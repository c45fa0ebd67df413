use std::io::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use finsum_core::DEFAULT_KNOWLEDGE_BASE;
use finsum_rag::{EmbeddingError, TextVector};
use finsum_scoring::{BiasVerdict, ScoringError};

use super::*;

const FED_ARTICLE: &str = "The Federal Reserve raised interest rates today.";
const FED_SUMMARY: &str = "- The Federal Reserve raised interest rates to curb inflation.\n\
                           - Borrowing costs are likely to climb for households and companies.";

/// Returns a fixed summary and records the prompt it was given.
struct CannedSummary {
    summary: String,
    prompt: Mutex<Option<String>>,
}

impl CannedSummary {
    fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            prompt: Mutex::new(None),
        }
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompt.lock().expect("prompt lock").clone()
    }
}

impl TextGenerator for CannedSummary {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        *self.prompt.lock().expect("prompt lock") = Some(prompt.to_string());
        Ok(self.summary.clone())
    }
}

struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Status {
            status: 500,
            body: "model not loaded".to_string(),
        })
    }
}

struct FailingClassifier;

impl SentimentClassifier for FailingClassifier {
    async fn logits(&self, _text: &str) -> Result<[f32; 3], ScoringError> {
        Err(ScoringError::Status(503))
    }
}

/// Hashing embedder that starts failing after `healthy_calls` requests.
struct FlakyEmbedder {
    inner: HashingEmbedder,
    healthy_calls: usize,
    calls: AtomicUsize,
}

impl FlakyEmbedder {
    fn new(healthy_calls: usize) -> Self {
        Self {
            inner: HashingEmbedder::new(384),
            healthy_calls,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Embedder for FlakyEmbedder {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<TextVector, EmbeddingError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.healthy_calls {
            return Err(EmbeddingError::Status {
                status: 503,
                text_len: text.chars().count(),
            });
        }
        self.inner.embed(text).await
    }
}

async fn default_index() -> VectorIndex {
    let corpus = KnowledgeBase::default();
    VectorIndex::build(&HashingEmbedder::new(384), &corpus.passages)
        .await
        .expect("built-in corpus should index")
}

async fn context<E, G, C: SentimentClassifier>(
    embedder: E,
    generator: G,
    classifier: C,
    keywords: &BiasKeywords,
) -> PipelineContext<E, G, C> {
    PipelineContext {
        embedder,
        index: default_index().await,
        generator,
        sentiment: SentimentScorer::new(classifier),
        bias: BiasScorer::new(keywords),
        top_k: 3,
    }
}

fn offline_config() -> AppConfig {
    AppConfig {
        log_level: "info".to_string(),
        ollama_url: "http://127.0.0.1:9".to_string(),
        chat_model: "llama3.2".to_string(),
        embedder: EmbedderKind::Hashing,
        embed_model: "nomic-embed-text".to_string(),
        embed_dimension: 384,
        sentiment_backend: SentimentBackend::Lexicon,
        tei_url: None,
        top_k: 3,
        request_timeout_secs: Some(5),
        knowledge_base_path: None,
        bias_keywords_path: None,
    }
}

// ---------------------------------------------------------------------------
// analyze_article
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fed_article_end_to_end() {
    let ctx = context(
        HashingEmbedder::new(384),
        CannedSummary::new(FED_SUMMARY),
        LexiconClassifier::new(),
        &BiasKeywords::default(),
    )
    .await;

    let analysis = analyze_article(&ctx, FED_ARTICLE)
        .await
        .expect("pipeline should complete");

    let fed_passage = DEFAULT_KNOWLEDGE_BASE[1];
    assert_eq!(analysis.context_passages.len(), 3);
    assert_eq!(analysis.context_passages[0], fed_passage);

    let prompt = ctx.generator.last_prompt().expect("generator was called");
    assert!(prompt.contains(fed_passage));
    assert!(prompt.contains(FED_ARTICLE));

    assert_eq!(analysis.summary, FED_SUMMARY);
    assert!(
        analysis.sentiment.label == "negative" || analysis.sentiment.label == "neutral",
        "unexpected sentiment {}",
        analysis.sentiment.label
    );
    let total: f64 = analysis.sentiment.scores.values().sum();
    assert!((total - 1.0).abs() < 1e-6);

    let bias = analysis.bias.expect("bias should be scored");
    assert_eq!(bias.verdict, BiasVerdict::Center);
    assert_eq!(analysis.related.len(), 3);
}

#[tokio::test]
async fn fed_article_sentiment_is_stable_across_runs() {
    let ctx = context(
        HashingEmbedder::new(384),
        CannedSummary::new(FED_SUMMARY),
        LexiconClassifier::new(),
        &BiasKeywords::default(),
    )
    .await;

    let first = analyze_article(&ctx, FED_ARTICLE).await.unwrap();
    let second = analyze_article(&ctx, FED_ARTICLE).await.unwrap();
    assert_eq!(first.sentiment, second.sentiment);
    assert_eq!(first.context_passages, second.context_passages);
    assert_eq!(first.related, second.related);
}

#[tokio::test]
async fn sentiment_failure_degrades_to_unknown() {
    let ctx = context(
        HashingEmbedder::new(384),
        CannedSummary::new(FED_SUMMARY),
        FailingClassifier,
        &BiasKeywords::default(),
    )
    .await;

    let analysis = analyze_article(&ctx, FED_ARTICLE)
        .await
        .expect("sentiment failure must not abort the request");

    assert_eq!(analysis.sentiment, SentimentView::unknown());
    assert_eq!(analysis.summary, FED_SUMMARY);
    assert_eq!(
        analysis.bias.map(|b| b.verdict),
        Some(BiasVerdict::Center)
    );

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(
        json["sentiment"],
        serde_json::json!({ "label": "unknown", "scores": {} })
    );
}

#[tokio::test]
async fn bias_failure_omits_verdict() {
    let empty = BiasKeywords {
        left: Vec::new(),
        right: Vec::new(),
    };
    let ctx = context(
        HashingEmbedder::new(384),
        CannedSummary::new(""),
        LexiconClassifier::new(),
        &empty,
    )
    .await;

    let analysis = analyze_article(&ctx, FED_ARTICLE).await.unwrap();

    assert!(analysis.bias.is_none());
    assert_eq!(analysis.sentiment.label, "neutral");

    let json = serde_json::to_value(&analysis).unwrap();
    assert!(json["bias"].is_null());
}

#[tokio::test]
async fn related_lookup_failure_yields_empty_list() {
    // First embed is the article query; the summary query fails.
    let ctx = context(
        FlakyEmbedder::new(1),
        CannedSummary::new(FED_SUMMARY),
        LexiconClassifier::new(),
        &BiasKeywords::default(),
    )
    .await;

    let analysis = analyze_article(&ctx, FED_ARTICLE).await.unwrap();

    assert_eq!(analysis.context_passages.len(), 3);
    assert!(analysis.related.is_empty());
}

#[tokio::test]
async fn article_embedding_failure_is_fatal() {
    let ctx = context(
        FlakyEmbedder::new(0),
        CannedSummary::new(FED_SUMMARY),
        LexiconClassifier::new(),
        &BiasKeywords::default(),
    )
    .await;

    let err = analyze_article(&ctx, FED_ARTICLE).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Retrieval(RetrievalError::Embedding(_))
    ));
    assert!(ctx.generator.last_prompt().is_none());
}

#[tokio::test]
async fn generation_failure_is_fatal() {
    let ctx = context(
        HashingEmbedder::new(384),
        FailingGenerator,
        LexiconClassifier::new(),
        &BiasKeywords::default(),
    )
    .await;

    let err = analyze_article(&ctx, FED_ARTICLE).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Generation(GenerationError::Status { status: 500, .. })
    ));
}

#[test]
fn wrapped_errors_name_their_cause_once() {
    let http = reqwest::Client::new()
        .get("::not a url")
        .build()
        .unwrap_err();
    let err = PipelineError::Client(http);
    assert_eq!(err.to_string(), "failed to build HTTP client");
    assert!(std::error::Error::source(&err).is_some());

    let err = PipelineError::from(GenerationError::Status {
        status: 503,
        body: "overloaded".to_string(),
    });
    assert_eq!(err.to_string(), "summary generation failed");
    let chain = format!("{:#}", anyhow::Error::from(err));
    assert_eq!(chain.matches("overloaded").count(), 1);
}

#[tokio::test]
async fn analysis_serializes_timestamp_and_bias_fields() {
    let ctx = context(
        HashingEmbedder::new(384),
        CannedSummary::new(
            "Conservative leaders promised tax cuts and stronger border security.",
        ),
        LexiconClassifier::new(),
        &BiasKeywords::default(),
    )
    .await;

    let analysis = analyze_article(&ctx, FED_ARTICLE).await.unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["bias"]["verdict"], "Right");
    assert!(json["bias"]["sim_right"].as_f64().unwrap() > 0.3);
    let stamp = json["analyzed_at"].as_str().expect("timestamp string");
    assert!(DateTime::parse_from_rfc3339(stamp).is_ok(), "{stamp}");
}

// ---------------------------------------------------------------------------
// Construction from config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn from_config_builds_offline_context() {
    let ctx = LiveContext::from_config(&offline_config())
        .await
        .expect("hashing + lexicon needs no network");

    assert_eq!(ctx.index.len(), DEFAULT_KNOWLEDGE_BASE.len());
    assert_eq!(ctx.index.dimension(), 384);
    assert_eq!(ctx.embedder.dimension(), 384);
    assert_eq!(ctx.top_k, 3);
    assert_eq!(ctx.generator.model(), "llama3.2");
}

#[tokio::test]
async fn knowledge_base_file_replaces_builtin_corpus() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "passages:\n  - Gold hit a record high.\n  - Bond yields fell sharply."
    )
    .unwrap();

    let mut config = offline_config();
    config.knowledge_base_path = Some(file.path().to_path_buf());

    let ctx = LiveContext::from_config(&config).await.unwrap();
    assert_eq!(ctx.index.len(), 2);
    assert_eq!(ctx.index.passages()[0].text(), "Gold hit a record high.");
}

#[tokio::test]
async fn missing_knowledge_base_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = offline_config();
    config.knowledge_base_path = Some(dir.path().join("absent.yaml"));

    let err = LiveContext::from_config(&config).await.err().expect("should fail");
    assert!(matches!(err, PipelineError::Config(ConfigError::FileIo { .. })));
}

#[test]
fn tei_backend_without_url_is_rejected() {
    let mut config = offline_config();
    config.sentiment_backend = SentimentBackend::Tei;

    let err = build_classifier(&config, reqwest::Client::new())
        .err()
        .expect("should fail");
    assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "FINSUM_TEI_URL"));
}

#[test]
fn bias_keywords_file_is_honoured() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "left:\n  - union\nright:\n  - deregulation").unwrap();

    let mut config = offline_config();
    config.bias_keywords_path = Some(file.path().to_path_buf());

    let scorer = build_bias_scorer(&config).unwrap();
    let report = scorer.score("Deregulation lifted bank shares.").unwrap();
    assert_eq!(report.verdict, BiasVerdict::Right);
}

#[test]
fn sentiment_view_keeps_all_three_labels() {
    let result = SentimentResult {
        label: finsum_scoring::SentimentLabel::Negative,
        scores: finsum_scoring::SentimentScores {
            positive: 0.1,
            negative: 0.7,
            neutral: 0.2,
        },
    };
    let view = SentimentView::from(result);
    assert_eq!(view.label, "negative");
    assert_eq!(
        view.scores.keys().map(String::as_str).collect::<Vec<_>>(),
        ["negative", "neutral", "positive"]
    );
}
