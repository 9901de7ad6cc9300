//! Settings loading.
//!
//! Settings come from three layers: compiled defaults, an optional
//! `config/default.toml`, and `AQUA_AGENT__*` environment overrides.
//! The language-model API key is resolved separately from `GROQ_API_KEY`
//! and its absence is fatal: the process must not start without it.

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::constants;

/// Settings loading failure. Every variant is fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing GROQ_API_KEY in environment")]
    MissingApiKey,
    #[error("invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub catalog: CatalogSettings,
    pub retrieval: RetrievalSettings,
    pub conversation: ConversationSettings,
    pub server: ServerSettings,
}

/// Language-model collaborator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Secret API key. Not read from the TOML layer in normal operation;
    /// resolved from the `GROQ_API_KEY` environment variable.
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: constants::generation::MODEL.to_string(),
            base_url: constants::endpoints::GROQ_DEFAULT.to_string(),
            timeout_secs: constants::timeouts::LLM_REQUEST_SECS,
            temperature: constants::generation::TEMPERATURE,
            max_tokens: None,
        }
    }
}

/// Catalog source settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Path to the product export CSV.
    pub path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: "data/new_export.csv".to_string(),
        }
    }
}

/// Similarity-retriever collaborator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Search endpoint of the retriever sidecar.
    pub endpoint: String,
    /// Results requested per query.
    pub top_k: usize,
    /// Fallback hits consumed per turn.
    pub take: usize,
    /// Re-confirm every hit against the catalog before surfacing it.
    pub validate_results: bool,
    pub timeout_secs: u64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            endpoint: constants::endpoints::RETRIEVER_DEFAULT.to_string(),
            top_k: constants::retrieval::TOP_K,
            take: constants::retrieval::FALLBACK_TAKE,
            validate_results: true,
            timeout_secs: constants::timeouts::RETRIEVER_REQUEST_SECS,
        }
    }
}

/// Conversation-shaping settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversationSettings {
    /// History entries kept per session; evicted oldest-first in
    /// user+bot pairs once exceeded.
    pub history_limit: usize,
    /// History lines included in the prompt payload.
    pub prompt_history_lines: usize,
    /// Clarifying questions asked in a single turn.
    pub max_questions_per_turn: usize,
    /// Prefix length for asked-question fingerprints.
    pub question_fingerprint_len: usize,
    /// Filtered products surfaced per turn.
    pub product_display_limit: usize,
    /// Products included in the prompt payload.
    pub prompt_product_limit: usize,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            history_limit: constants::conversation::HISTORY_LIMIT,
            prompt_history_lines: constants::conversation::PROMPT_HISTORY_LINES,
            max_questions_per_turn: constants::conversation::MAX_QUESTIONS_PER_TURN,
            question_fingerprint_len: constants::conversation::QUESTION_FINGERPRINT_LEN,
            product_display_limit: constants::conversation::PRODUCT_DISPLAY_LIMIT,
            prompt_product_limit: constants::conversation::PROMPT_PRODUCT_LIMIT,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the optional `config/default.toml`, apply
    /// `AQUA_AGENT__*` environment overrides, then resolve the API key
    /// from `GROQ_API_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("AQUA_AGENT").separator("__"))
            .build()?
            .try_deserialize()?;

        match std::env::var("GROQ_API_KEY") {
            Ok(key) if !key.trim().is_empty() => settings.llm.api_key = key,
            _ if !settings.llm.api_key.is_empty() => {}
            _ => return Err(ConfigError::MissingApiKey),
        }

        tracing::debug!(
            model = %settings.llm.model,
            catalog = %settings.catalog.path,
            "settings loaded"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "llama-3.1-8b-instant");
        assert_eq!(settings.conversation.history_limit, 12);
        assert_eq!(settings.conversation.max_questions_per_turn, 2);
        assert_eq!(settings.retrieval.top_k, 15);
        assert!(settings.retrieval.validate_results);
        assert!(settings.llm.api_key.is_empty());
    }

    #[test]
    fn test_history_limit_is_even() {
        // History is recorded in user+bot pairs; an odd cap would strand
        // a half pair at the eviction boundary.
        assert_eq!(Settings::default().conversation.history_limit % 2, 0);
    }
}
