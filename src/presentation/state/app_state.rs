use std::sync::Arc;

use crate::application::ports::{FileLoader, LlmClient, StagingStore, TextSplitter, VectorStore};
use crate::application::services::{IngestionService, RetrievalService, TableInsightService};

pub struct AppState<F, L, V, T: ?Sized>
where
    F: FileLoader,
    L: LlmClient,
    V: VectorStore,
    T: TextSplitter,
{
    pub ingestion_service: Arc<IngestionService<F, V, T>>,
    pub retrieval_service: Arc<RetrievalService<L, V>>,
    pub table_insight_service: Arc<TableInsightService>,
    pub staging_store: Arc<dyn StagingStore>,
}

impl<F, L, V, T: ?Sized> Clone for AppState<F, L, V, T>
where
    F: FileLoader,
    L: LlmClient,
    V: VectorStore,
    T: TextSplitter,
{
    fn clone(&self) -> Self {
        Self {
            ingestion_service: Arc::clone(&self.ingestion_service),
            retrieval_service: Arc::clone(&self.retrieval_service),
            table_insight_service: Arc::clone(&self.table_insight_service),
            staging_store: Arc::clone(&self.staging_store),
        }
    }
}
