//! Reference data: knowledge-base passages and bias keyword lists.
//!
//! Both ship with compiled-in defaults and can be replaced by YAML files
//! named in the environment (see [`crate::AppConfig`]).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Financial background passages the retriever draws context from.
pub const DEFAULT_KNOWLEDGE_BASE: &[&str] = &[
    "The stock market closed higher today with technology stocks leading the gains.",
    "The Federal Reserve announced an interest rate hike amid inflation concerns.",
    "Oil prices surged due to supply constraints and geopolitical tensions.",
    "Cryptocurrency markets saw a sharp decline following regulatory crackdowns.",
    "Major banks reported better-than-expected quarterly earnings.",
    "The housing market shows signs of cooling off as mortgage rates rise.",
    "Unemployment rates dropped to a new low, signaling strong economic growth.",
    "Central banks around the world are coordinating policies to stabilize currencies.",
    "The government unveiled new stimulus packages aimed at supporting small businesses.",
    "Trade negotiations between major economies have stalled, impacting global markets.",
];

pub const DEFAULT_LEFT_KEYWORDS: &[&str] = &[
    "climate change",
    "diversity",
    "social justice",
    "inequality",
    "progressive",
    "gun control",
];

pub const DEFAULT_RIGHT_KEYWORDS: &[&str] = &[
    "tax cuts",
    "border security",
    "second amendment",
    "free market",
    "patriot",
    "conservative",
];

/// Ordered corpus of reference passages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub passages: Vec<String>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            passages: DEFAULT_KNOWLEDGE_BASE
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

/// Keyword phrases that define the two poles of the bias heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasKeywords {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for BiasKeywords {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|k| (*k).to_string()).collect();
        Self {
            left: owned(DEFAULT_LEFT_KEYWORDS),
            right: owned(DEFAULT_RIGHT_KEYWORDS),
        }
    }
}

/// Load and validate a knowledge base from a YAML file of the form
/// `passages: [ ... ]`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_knowledge_base(path: &Path) -> Result<KnowledgeBase, ConfigError> {
    let content = read_file(path)?;
    parse_knowledge_base(&content)
}

/// Load and validate bias keywords from a YAML file of the form
/// `left: [ ... ]` / `right: [ ... ]`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_bias_keywords(path: &Path) -> Result<BiasKeywords, ConfigError> {
    let content = read_file(path)?;
    parse_bias_keywords(&content)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })
}

fn parse_knowledge_base(content: &str) -> Result<KnowledgeBase, ConfigError> {
    let kb: KnowledgeBase = serde_yaml::from_str(content)?;

    if kb.passages.is_empty() {
        return Err(ConfigError::Validation(
            "knowledge base must contain at least one passage".to_string(),
        ));
    }
    if let Some(idx) = kb.passages.iter().position(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "knowledge base passage {idx} is blank"
        )));
    }

    Ok(kb)
}

fn parse_bias_keywords(content: &str) -> Result<BiasKeywords, ConfigError> {
    let keywords: BiasKeywords = serde_yaml::from_str(content)?;

    for (side, list) in [("left", &keywords.left), ("right", &keywords.right)] {
        if list.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{side} keyword list must be non-empty"
            )));
        }
        if list.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{side} keyword list contains a blank entry"
            )));
        }
    }

    Ok(keywords)
}
