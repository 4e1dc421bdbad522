use async_trait::async_trait;

use super::CollectionConfig;
use crate::domain::{Chunk, CollectionName, DocumentId, Embedding};

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creates the collection when missing. Returns `true` if it was created.
    async fn ensure_collection(
        &self,
        collection: &CollectionName,
        config: &CollectionConfig,
    ) -> Result<bool, VectorStoreError>;

    async fn upsert(
        &self,
        collection: &CollectionName,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError>;

    async fn search(
        &self,
        collection: &CollectionName,
        embedding: &Embedding,
        top_k: usize,
        document_id: Option<DocumentId>,
    ) -> Result<Vec<SearchResult>, VectorStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("collection creation failed: {0}")]
    CollectionCreationFailed(String),
    #[error("payload index creation failed: {0}")]
    PayloadIndexFailed(String),
    #[error("upsert failed: {0}")]
    UpsertFailed(String),
    #[error("search failed: {0}")]
    SearchFailed(String),
}
