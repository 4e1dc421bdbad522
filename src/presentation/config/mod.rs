mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    ChunkingSettings, ChunkingStrategy, DatabaseSettings, EmbeddingsSettings, LlmSettings,
    LoggingSettings, QdrantSettings, RetrievalSettings, ServerSettings, Settings,
    StorageSettings,
};
