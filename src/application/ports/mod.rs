mod collection_config;
mod embedder;
mod file_loader;
mod llm_client;
mod section_sink;
mod staging_store;
mod table_inspector;
mod text_splitter;
mod vector_store;

pub use collection_config::{CollectionConfig, DistanceMetric, PayloadFieldType, PayloadIndex};
pub use embedder::{Embedder, EmbedderError};
pub use file_loader::{FileLoader, FileLoaderError};
pub use llm_client::{LlmClient, LlmClientError, Prompt};
pub use section_sink::{SectionSink, SinkError};
pub use staging_store::{StagingStore, StagingStoreError};
pub use table_inspector::{TableInspector, TableInspectorError};
pub use text_splitter::{TextSplitter, TextSplitterError};
pub use vector_store::{SearchResult, VectorStore, VectorStoreError};
