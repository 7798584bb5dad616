//! Service configuration loaded from the environment at startup.
//!
//! Every knob has a sensible default so a dev instance boots with only
//! the provider credentials set. Missing credentials are deliberately
//! non-fatal at load time; the affected backend simply fails at call
//! time and the failover chain moves on.

use std::env;

pub const APP_NAME: &str = "MedExa";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_MODELS: &str = "google/gemma-3-27b-it:free,qwen/qwen-2.5-vl-72b-instruct:free";
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_EMBEDDING_URL: &str = "http://localhost:11434";
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
const DEFAULT_EMBEDDING_DIM: usize = 768;
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TOP_K: usize = 3;
const DEFAULT_HISTORY_CAP: usize = 6;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("History cap must be a positive even number, got {0}")]
    OddHistoryCap(usize),
}

/// Runtime configuration, resolved once in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model ids in failover priority order.
    pub models: Vec<String>,
    pub base_url: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub index_host: Option<String>,
    pub index_api_key: String,
    pub top_k: usize,
    pub history_cap: usize,
    pub bind_addr: String,
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let models: Vec<String> = env::var("MEDEXA_MODELS")
            .unwrap_or_else(|_| DEFAULT_MODELS.to_string())
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        let api_key = env::var("OPENROUTER_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("OPENROUTER_API_KEY is not set; generation backends will fail");
        }

        let history_cap = parse_var("MEDEXA_HISTORY_CAP", DEFAULT_HISTORY_CAP)?;
        if history_cap == 0 || history_cap % 2 != 0 {
            return Err(ConfigError::OddHistoryCap(history_cap));
        }

        Ok(Self {
            models,
            base_url: env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key,
            temperature: parse_var("MEDEXA_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            timeout_secs: parse_var("MEDEXA_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            embedding_url: env::var("MEDEXA_EMBEDDING_URL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_URL.to_string()),
            embedding_model: env::var("MEDEXA_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_dim: parse_var("MEDEXA_EMBEDDING_DIM", DEFAULT_EMBEDDING_DIM)?,
            index_host: env::var("MEDEXA_INDEX_HOST").ok().filter(|h| !h.is_empty()),
            index_api_key: env::var("MEDEXA_INDEX_API_KEY").unwrap_or_default(),
            top_k: parse_var("MEDEXA_TOP_K", DEFAULT_TOP_K)?,
            history_cap,
            bind_addr: env::var("MEDEXA_BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.split(',').map(String::from).collect(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            embedding_url: DEFAULT_EMBEDDING_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            index_host: None,
            index_api_key: String::new(),
            top_k: DEFAULT_TOP_K,
            history_cap: DEFAULT_HISTORY_CAP,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_coherent() {
        let config = Config::default();
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.history_cap, 6);
        assert_eq!(config.history_cap % 2, 0);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn primary_model_comes_first() {
        let config = Config::default();
        assert_eq!(config.models[0], "google/gemma-3-27b-it:free");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
