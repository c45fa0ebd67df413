mod pipeline;
mod render;

use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finsum_core::AppConfig;
use finsum_rag::Retriever;
use finsum_scoring::SentimentScorer;

use crate::pipeline::{analyze_article, LiveContext};

#[derive(Debug, Parser)]
#[command(name = "finsum")]
#[command(about = "Summarize financial news with retrieved context and score the summary")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Summarize an article, then score the summary for sentiment and bias
    Analyze {
        #[command(flatten)]
        input: TextInput,

        /// Also write the raw summary to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the knowledge-base passages closest to a query
    Retrieve {
        query: String,

        /// Number of passages (defaults to `FINSUM_TOP_K`)
        #[arg(long, value_parser = parse_top_k)]
        k: Option<usize>,

        #[arg(long)]
        json: bool,
    },
    /// Score the sentiment of a text without generating a summary
    Sentiment {
        #[command(flatten)]
        input: TextInput,

        #[arg(long)]
        json: bool,
    },
    /// Score the political leaning of a text without generating a summary
    Bias {
        #[command(flatten)]
        input: TextInput,

        #[arg(long)]
        json: bool,
    },
}

/// Where to read input text from. Standard input is used when neither flag
/// is given.
#[derive(Debug, Args)]
struct TextInput {
    /// Text passed inline
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Read the text from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

fn parse_top_k(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(k) => Ok(k),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = finsum_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            json,
        } => run_analyze(&config, &input, output.as_deref(), json).await,
        Commands::Retrieve { query, k, json } => run_retrieve(&config, &query, k, json).await,
        Commands::Sentiment { input, json } => run_sentiment(&config, &input, json).await,
        Commands::Bias { input, json } => run_bias(&config, &input, json),
    }
}

async fn run_analyze(
    config: &AppConfig,
    input: &TextInput,
    output: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let article = read_input(input)?;
    let ctx = LiveContext::from_config(config).await?;
    let analysis = analyze_article(&ctx, &article).await?;

    if let Some(path) = output {
        std::fs::write(path, &analysis.summary)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        tracing::info!(path = %path.display(), "summary written");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", render::render_analysis(&analysis));
    }
    Ok(())
}

async fn run_retrieve(
    config: &AppConfig,
    query: &str,
    k: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let client = pipeline::http_client(config)?;
    let embedder = pipeline::build_embedder(config, client);
    let index = pipeline::build_index(config, &embedder).await?;

    let k = k.unwrap_or(config.top_k);
    let passages = Retriever::new(&embedder, &index)
        .retrieve_scored(query, k)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&passages)?);
    } else {
        print!("{}", render::render_passages(&passages));
    }
    Ok(())
}

async fn run_sentiment(config: &AppConfig, input: &TextInput, json: bool) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let client = pipeline::http_client(config)?;
    let scorer = SentimentScorer::new(pipeline::build_classifier(config, client)?);
    let result = scorer.score(&text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::render_sentiment(&result));
    }
    Ok(())
}

fn run_bias(config: &AppConfig, input: &TextInput, json: bool) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let report = pipeline::build_bias_scorer(config)?.score(&text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_bias(&report));
    }
    Ok(())
}

/// Resolve `input` to non-blank text.
fn read_input(input: &TextInput) -> anyhow::Result<String> {
    let text = if let Some(text) = &input.text {
        text.clone()
    } else if let Some(path) = &input.file {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read standard input")?;
        buf
    };

    if text.trim().is_empty() {
        anyhow::bail!("input text is empty");
    }
    Ok(text)
}
