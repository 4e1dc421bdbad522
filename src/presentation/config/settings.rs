use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::infrastructure::text_processing::TailPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub qdrant: QdrantSettings,
    pub embeddings: EmbeddingsSettings,
    pub llm: LlmSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QdrantSettings {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub chat_model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    Semantic,
    Token,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingSettings {
    pub strategy: ChunkingStrategy,
    pub docx_group_size: usize,
    pub pdf_group_size: usize,
    pub min_section_chars: usize,
    pub max_expansions: u32,
    pub tail_policy: TailPolicy,
    pub section_joiner: String,
    pub llm_max_attempts: u32,
    pub llm_initial_backoff_ms: u64,
    pub token_limit: usize,
    pub overlap_fraction: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub max_context_tokens: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub catalog_path: String,
    pub sample_rows: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub local_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Loads `.env`, then layers built-in defaults, `appsettings.{environment}` and
    /// `APP__`-prefixed variables such as `APP__LLM__API_KEY`.
    pub fn load() -> Result<(Self, Environment), ConfigError> {
        dotenvy::dotenv().ok();
        let environment = Environment::from_env().map_err(ConfigError::Message)?;
        let settings = Self::load_for(environment)?;
        Ok((settings, environment))
    }

    pub fn load_for(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?.build()?.try_deserialize()
    }

    fn builder(
        environment: Environment,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("qdrant.url", "http://localhost:6334")?
            .set_default("embeddings.base_url", "https://api.openai.com/v1")?
            .set_default("embeddings.api_key", "")?
            .set_default("embeddings.model", "text-embedding-3-small")?
            .set_default("llm.base_url", "https://api.openai.com/v1")?
            .set_default("llm.api_key", "")?
            .set_default("llm.chat_model", "gpt-4o-mini")?
            .set_default("llm.max_tokens", 1024)?
            .set_default("llm.temperature", 0.0)?
            .set_default("llm.request_timeout_secs", 60)?
            .set_default("chunking.strategy", "semantic")?
            .set_default("chunking.docx_group_size", 150)?
            .set_default("chunking.pdf_group_size", 40)?
            .set_default("chunking.min_section_chars", 128)?
            .set_default("chunking.max_expansions", 8)?
            .set_default("chunking.tail_policy", "separate")?
            .set_default("chunking.section_joiner", "\n")?
            .set_default("chunking.llm_max_attempts", 5)?
            .set_default("chunking.llm_initial_backoff_ms", 500)?
            .set_default("chunking.token_limit", 1000)?
            .set_default("chunking.overlap_fraction", 0.34)?
            .set_default("retrieval.top_k", 10)?
            .set_default("retrieval.max_context_tokens", 10_000)?
            .set_default("database.max_connections", 5)?
            .set_default("database.catalog_path", "db_configs/tables.json")?
            .set_default("database.sample_rows", 100)?
            .set_default("logging.level", "info,docsense=debug,tower_http=debug")?
            .set_default("logging.enable_json", false)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            ))
    }
}
