use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
}

/// Connection settings for the external document store.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Base URL of the store service, e.g. `http://127.0.0.1:7801`.
    pub endpoint: String,
    /// Local data directory the store session is opened against.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Number of ranked results requested per query.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Namespace URI files are added under when no `--target` is given.
    #[serde(default = "default_ingest_target")]
    pub ingest_target: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            ingest_target: default_ingest_target(),
        }
    }
}

fn default_limit() -> usize {
    3
}

fn default_ingest_target() -> String {
    "viking://resources/contract".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions API.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Request timeout in seconds for the completion call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "LLM_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.store.endpoint.trim().is_empty() {
        anyhow::bail!("store.endpoint must not be empty");
    }

    if config.retrieval.limit == 0 {
        anyhow::bail!("retrieval.limit must be >= 1");
    }

    if config.llm.base_url.trim().is_empty() {
        anyhow::bail!("llm.base_url must not be empty");
    }

    if config.llm.model.trim().is_empty() {
        anyhow::bail!("llm.model must not be empty");
    }

    if config.llm.timeout_secs == 0 {
        anyhow::bail!("llm.timeout_secs must be > 0");
    }

    Ok(config)
}
