use std::path::PathBuf;

use crate::app_config::{AppConfig, EmbedderKind, SentimentBackend};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or a conditionally required
/// variable is missing.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or a conditionally required
/// variable is missing.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.parse::<usize>().map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let log_level = or_default("FINSUM_LOG_LEVEL", "info");
    let ollama_url = or_default("FINSUM_OLLAMA_URL", "http://localhost:11434");
    let chat_model = or_default("FINSUM_CHAT_MODEL", "llama3.2");
    let embed_model = or_default("FINSUM_EMBED_MODEL", "nomic-embed-text");

    let embedder = parse_embedder(&or_default("FINSUM_EMBEDDER", "ollama"))?;
    let embed_dimension = parse_usize("FINSUM_EMBED_DIMENSION", embedder.default_dimension())?;
    if embed_dimension == 0 {
        return Err(invalid(
            "FINSUM_EMBED_DIMENSION",
            "must be at least 1".to_string(),
        ));
    }

    let sentiment_backend =
        parse_sentiment_backend(&or_default("FINSUM_SENTIMENT_BACKEND", "lexicon"))?;
    let tei_url = lookup("FINSUM_TEI_URL").ok();
    if sentiment_backend == SentimentBackend::Tei && tei_url.is_none() {
        return Err(ConfigError::MissingEnvVar("FINSUM_TEI_URL".to_string()));
    }

    let top_k = parse_usize("FINSUM_TOP_K", 3)?;
    if top_k == 0 {
        return Err(invalid("FINSUM_TOP_K", "must be at least 1".to_string()));
    }

    let request_timeout_secs = match lookup("FINSUM_REQUEST_TIMEOUT_SECS") {
        Ok(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("FINSUM_REQUEST_TIMEOUT_SECS", e.to_string()))?,
        ),
        Err(_) => None,
    };

    let knowledge_base_path = lookup("FINSUM_KNOWLEDGE_BASE_PATH").ok().map(PathBuf::from);
    let bias_keywords_path = lookup("FINSUM_BIAS_KEYWORDS_PATH").ok().map(PathBuf::from);

    Ok(AppConfig {
        log_level,
        ollama_url,
        chat_model,
        embedder,
        embed_model,
        embed_dimension,
        sentiment_backend,
        tei_url,
        top_k,
        request_timeout_secs,
        knowledge_base_path,
        bias_keywords_path,
    })
}

fn parse_embedder(s: &str) -> Result<EmbedderKind, ConfigError> {
    match s {
        "ollama" => Ok(EmbedderKind::Ollama),
        "hashing" => Ok(EmbedderKind::Hashing),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FINSUM_EMBEDDER".to_string(),
            reason: format!("unknown embedder '{other}'; expected 'ollama' or 'hashing'"),
        }),
    }
}

fn parse_sentiment_backend(s: &str) -> Result<SentimentBackend, ConfigError> {
    match s {
        "lexicon" => Ok(SentimentBackend::Lexicon),
        "tei" => Ok(SentimentBackend::Tei),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FINSUM_SENTIMENT_BACKEND".to_string(),
            reason: format!("unknown sentiment backend '{other}'; expected 'lexicon' or 'tei'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
