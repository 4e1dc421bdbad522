#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use docsense::application::ports::{
    CollectionConfig, Embedder, EmbedderError, FileLoader, FileLoaderError, LlmClient,
    LlmClientError, Prompt, SearchResult, SectionSink, SinkError, TableInspector,
    TableInspectorError, VectorStore, VectorStoreError,
};
use docsense::domain::{
    Chunk, CollectionName, ContentType, Document, DocumentId, Embedding, Marker, Section,
    TextBlock,
};

pub fn docx_document(filename: &str) -> Document {
    Document::new(filename.to_string(), ContentType::Docx, 0)
}

pub fn blocks(texts: &[&str]) -> Vec<TextBlock> {
    texts.iter().map(|t| TextBlock::new(*t, None)).collect()
}

/// A fenced boundary answer naming the given marker indexes.
pub fn boundary_response(indexes: &[u32]) -> String {
    let markers = indexes
        .iter()
        .map(|i| format!("'{}'", Marker::new(*i)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("```python\nsections = [{markers}]\n```")
}

/// Replays queued responses in order and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedLlmClient {
    responses: Mutex<VecDeque<Result<String, LlmClientError>>>,
    prompts: Mutex<Vec<Prompt>>,
    calls: AtomicUsize,
}

impl ScriptedLlmClient {
    pub fn new(responses: Vec<Result<String, LlmClientError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn answering<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(responses.into_iter().map(|r| Ok(r.into())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmClientError::InvalidResponse("script exhausted".into())))
    }
}

/// Embeds text as `[byte length, 1.0]`.
pub struct MockEmbedder;

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        Ok(Embedding::new(vec![text.len() as f32, 1.0]))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        Ok(texts
            .iter()
            .map(|t| Embedding::new(vec![t.len() as f32, 1.0]))
            .collect())
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedderError> {
        Err(EmbedderError::RateLimited)
    }

    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        Err(EmbedderError::RateLimited)
    }
}

#[derive(Default)]
pub struct InMemoryVectorStore {
    points: Mutex<Vec<(CollectionName, Chunk, Embedding)>>,
    collections: Mutex<Vec<(CollectionName, CollectionConfig)>>,
    canned: Mutex<Vec<SearchResult>>,
    filters: Mutex<Vec<Option<DocumentId>>>,
}

impl InMemoryVectorStore {
    /// A store whose searches always return `results`, in the given order.
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        let store = Self::default();
        *store.canned.lock().unwrap() = results;
        store
    }

    pub fn chunks(&self, collection: &str) -> Vec<Chunk> {
        self.points
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _, _)| c.as_str() == collection)
            .map(|(_, chunk, _)| chunk.clone())
            .collect()
    }

    pub fn collections(&self) -> Vec<(CollectionName, CollectionConfig)> {
        self.collections.lock().unwrap().clone()
    }

    pub fn search_filters(&self) -> Vec<Option<DocumentId>> {
        self.filters.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_collection(
        &self,
        collection: &CollectionName,
        config: &CollectionConfig,
    ) -> Result<bool, VectorStoreError> {
        let mut collections = self.collections.lock().unwrap();
        if collections.iter().any(|(c, _)| c == collection) {
            return Ok(false);
        }
        collections.push((collection.clone(), config.clone()));
        Ok(true)
    }

    async fn upsert(
        &self,
        collection: &CollectionName,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::UpsertFailed("length mismatch".into()));
        }
        let mut points = self.points.lock().unwrap();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            points.push((collection.clone(), chunk.clone(), embedding.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &CollectionName,
        embedding: &Embedding,
        top_k: usize,
        document_id: Option<DocumentId>,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        self.filters.lock().unwrap().push(document_id);

        let canned = self.canned.lock().unwrap().clone();
        if !canned.is_empty() {
            return Ok(canned.into_iter().take(top_k).collect());
        }

        let mut results: Vec<SearchResult> = self
            .points
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, chunk, _)| {
                c == collection && document_id.is_none_or(|id| chunk.document_id == id)
            })
            .map(|(_, chunk, stored)| SearchResult {
                chunk: chunk.clone(),
                score: stored.euclidean_distance(embedding).unwrap_or(f32::MAX),
            })
            .collect();
        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results.truncate(top_k);
        Ok(results)
    }
}

/// Returns fixed blocks for every document.
pub struct MockFileLoader {
    blocks: Vec<TextBlock>,
}

impl MockFileLoader {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            blocks: blocks(texts),
        }
    }
}

#[async_trait]
impl FileLoader for MockFileLoader {
    async fn extract_blocks(
        &self,
        _data: &[u8],
        document: &Document,
    ) -> Result<Vec<TextBlock>, FileLoaderError> {
        if self.blocks.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }
        Ok(self.blocks.clone())
    }
}

/// Fails extraction for any filename containing `corrupt`.
pub struct SelectiveFileLoader {
    blocks: Vec<TextBlock>,
}

impl SelectiveFileLoader {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            blocks: blocks(texts),
        }
    }
}

#[async_trait]
impl FileLoader for SelectiveFileLoader {
    async fn extract_blocks(
        &self,
        _data: &[u8],
        document: &Document,
    ) -> Result<Vec<TextBlock>, FileLoaderError> {
        if document.filename.contains("corrupt") {
            return Err(FileLoaderError::ExtractionFailed("bad archive".into()));
        }
        Ok(self.blocks.clone())
    }
}

pub struct MockTableInspector {
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Value>,
    sampled_limits: Mutex<Vec<u32>>,
}

impl MockTableInspector {
    pub fn new(columns: &[&str], rows: Vec<serde_json::Value>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            sampled_limits: Mutex::new(Vec::new()),
        }
    }

    pub fn sampled_limits(&self) -> Vec<u32> {
        self.sampled_limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl TableInspector for MockTableInspector {
    async fn columns(&self, table: &str) -> Result<Vec<String>, TableInspectorError> {
        if self.columns.is_empty() {
            return Err(TableInspectorError::TableNotFound(table.to_string()));
        }
        Ok(self.columns.clone())
    }

    async fn sample_rows(
        &self,
        _table: &str,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>, TableInspectorError> {
        self.sampled_limits.lock().unwrap().push(limit);
        Ok(self.rows.iter().take(limit as usize).cloned().collect())
    }
}

#[derive(Default)]
pub struct VecSink {
    pub sections: Vec<Section>,
    pub finished: bool,
}

impl SectionSink for VecSink {
    fn write(&mut self, section: &Section) -> Result<(), SinkError> {
        self.sections.push(section.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }
}

pub struct FailingSink;

impl SectionSink for FailingSink {
    fn write(&mut self, _section: &Section) -> Result<(), SinkError> {
        Err(SinkError::WriteFailed("disk full".into()))
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
