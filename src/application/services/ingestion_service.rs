use std::sync::Arc;

use crate::application::ports::{
    CollectionConfig, Embedder, EmbedderError, FileLoader, FileLoaderError, TextSplitter,
    TextSplitterError, VectorStore, VectorStoreError,
};
use crate::domain::{Chunk, CollectionName, ContentType, Document, DocumentId};

use super::count_tokens;

pub struct IngestionService<F, V, T: ?Sized>
where
    F: FileLoader,
    V: VectorStore,
    T: TextSplitter,
{
    file_loader: Arc<F>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<V>,
    text_splitter: Arc<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionReport {
    pub document_id: DocumentId,
    pub section_count: usize,
}

impl<F, V, T: ?Sized> IngestionService<F, V, T>
where
    F: FileLoader,
    V: VectorStore,
    T: TextSplitter,
{
    pub fn new(
        file_loader: Arc<F>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<V>,
        text_splitter: Arc<T>,
    ) -> Self {
        Self {
            file_loader,
            embedder,
            vector_store,
            text_splitter,
        }
    }

    pub async fn ingest(
        &self,
        data: &[u8],
        filename: String,
        content_type: ContentType,
        collection: &CollectionName,
    ) -> Result<IngestionReport, IngestionError> {
        let document = Document::new(filename, content_type, data.len() as u64);
        self.ingest_document(&document, data, collection).await
    }

    /// Ingests under a caller-chosen document id, e.g. the id a staged upload was given.
    #[tracing::instrument(
        skip(self, document, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
            collection = %collection,
        )
    )]
    pub async fn ingest_document(
        &self,
        document: &Document,
        data: &[u8],
        collection: &CollectionName,
    ) -> Result<IngestionReport, IngestionError> {
        let blocks = self
            .file_loader
            .extract_blocks(data, document)
            .await
            .map_err(IngestionError::FileLoading)?;

        let sections = self
            .text_splitter
            .split(document, &blocks)
            .await
            .map_err(IngestionError::Splitting)?;

        let report = IngestionReport {
            document_id: document.id,
            section_count: sections.len(),
        };
        if sections.is_empty() {
            tracing::warn!("Document produced no sections, nothing stored");
            return Ok(report);
        }

        let chunks: Vec<Chunk> = sections
            .into_iter()
            .map(|section| {
                let tokens = count_tokens(&section.content);
                Chunk::from_section(document.id, section, tokens)
            })
            .collect();

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(IngestionError::Embedding)?;

        let dimensions = embeddings.first().map_or(0, |e| e.dimensions()) as u64;
        let created = self
            .vector_store
            .ensure_collection(collection, &CollectionConfig::new(dimensions))
            .await
            .map_err(IngestionError::Storage)?;
        if created {
            tracing::info!(dimensions, "Created vector collection");
        }

        self.vector_store
            .upsert(collection, &chunks, &embeddings)
            .await
            .map_err(IngestionError::Storage)?;

        tracing::info!(sections = report.section_count, "Document ingested");
        Ok(report)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("storage: {0}")]
    Storage(#[from] VectorStoreError),
}
