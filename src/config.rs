// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::AppError;

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Settings for the optional language-model stage.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

/// Runtime configuration resolved from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Financial Modeling Prep key, used for filing search and balance sheets.
    pub fmp_api_key: String,
    /// sec-api.io key, used for section extraction.
    pub sec_api_key: String,
    /// `None` when no language-model credential is configured.
    pub llm: Option<LlmConfig>,
    pub cache_dir: PathBuf,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let fmp_api_key = get("FMP_API_KEY").ok_or_else(|| {
            AppError::Config("FMP_API_KEY is not set in the environment variables".to_string())
        })?;
        let sec_api_key = get("SEC_API_KEY").ok_or_else(|| {
            AppError::Config("SEC_API_KEY is not set in the environment variables".to_string())
        })?;

        let timeout_secs = match get("LLM_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("LLM_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))
            })?,
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let llm = get("OPENAI_API_KEY").map(|api_key| LlmConfig {
            api_key,
            api_base: get("OPENAI_API_BASE").unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
            model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        });

        let cache_dir = get("SECTION_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));

        Ok(Self { fmp_api_key, sec_api_key, llm, cache_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_fmp_key_is_config_error() {
        let result = Config::from_lookup(lookup(&[("SEC_API_KEY", "sec")]));
        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("FMP_API_KEY")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_sec_key_counts_as_missing() {
        let result = Config::from_lookup(lookup(&[("FMP_API_KEY", "fmp"), ("SEC_API_KEY", "  ")]));
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("SEC_API_KEY")));
    }

    #[test]
    fn test_llm_is_optional_and_defaults_apply() {
        let config = Config::from_lookup(lookup(&[("FMP_API_KEY", "fmp"), ("SEC_API_KEY", "sec")])).unwrap();
        assert!(config.llm.is_none());
        assert_eq!(config.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));

        let config = Config::from_lookup(lookup(&[
            ("FMP_API_KEY", "fmp"),
            ("SEC_API_KEY", "sec"),
            ("OPENAI_API_KEY", "sk-test"),
            ("LLM_TIMEOUT_SECS", "30"),
            ("SECTION_CACHE_DIR", "/tmp/sections"),
        ]))
        .unwrap();
        let llm = config.llm.expect("llm config");
        assert_eq!(llm.api_base, DEFAULT_OPENAI_API_BASE);
        assert_eq!(llm.model, DEFAULT_LLM_MODEL);
        assert_eq!(llm.timeout, Duration::from_secs(30));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/sections"));
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("FMP_API_KEY", "fmp"),
            ("SEC_API_KEY", "sec"),
            ("LLM_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
