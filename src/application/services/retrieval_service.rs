use std::sync::Arc;

use crate::application::ports::{
    Embedder, EmbedderError, LlmClient, LlmClientError, Prompt, VectorStore, VectorStoreError,
};
use crate::domain::{CollectionName, DocumentId};

pub const NO_CONTEXT_ANSWER: &str = "No relevant context found.";

const GROUNDING_PROMPT: &str = "You answer questions about a document. Use only the \
context provided with the question. If the context does not contain the answer, say that \
you do not know instead of guessing.";

pub struct RetrievalService<L, V>
where
    L: LlmClient,
    V: VectorStore,
{
    embedder: Arc<dyn Embedder>,
    llm_client: Arc<L>,
    vector_store: Arc<V>,
    top_k: usize,
    max_context_tokens: usize,
}

impl<L, V> RetrievalService<L, V>
where
    L: LlmClient,
    V: VectorStore,
{
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm_client: Arc<L>,
        vector_store: Arc<V>,
        top_k: usize,
        max_context_tokens: usize,
    ) -> Self {
        Self {
            embedder,
            llm_client,
            vector_store,
            top_k,
            max_context_tokens,
        }
    }

    #[tracing::instrument(skip(self, question), fields(collection = %collection))]
    pub async fn query(
        &self,
        question: &str,
        collection: &CollectionName,
        document_id: Option<DocumentId>,
    ) -> Result<QueryResponse, RetrievalError> {
        let query_embedding = self
            .embedder
            .embed(question)
            .await
            .map_err(RetrievalError::Embedding)?;

        let results = self
            .vector_store
            .search(collection, &query_embedding, self.top_k, document_id)
            .await
            .map_err(RetrievalError::Search)?;

        let mut used_tokens = 0;
        let mut selected = Vec::new();
        for result in results {
            if used_tokens + result.chunk.token_count >= self.max_context_tokens {
                break;
            }
            used_tokens += result.chunk.token_count;
            selected.push(result);
        }

        if selected.is_empty() {
            return Ok(QueryResponse {
                answer: NO_CONTEXT_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        tracing::debug!(chunks = selected.len(), used_tokens, "Context assembled");

        let context = selected
            .iter()
            .map(|r| format!("{} {}", r.chunk.marker, r.chunk.text))
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = Prompt::with_system(
            GROUNDING_PROMPT,
            format!("Context:\n{context}\n\nQuestion: {question}"),
        );
        let answer = self
            .llm_client
            .complete(&prompt)
            .await
            .map_err(RetrievalError::Completion)?;

        let sources = selected
            .into_iter()
            .map(|r| SourceChunk {
                marker: r.chunk.marker.to_string(),
                text: r.chunk.text,
                page: r.chunk.page,
                score: r.score,
            })
            .collect();

        Ok(QueryResponse { answer, sources })
    }
}

#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceChunk>,
}

#[derive(Debug, Clone)]
pub struct SourceChunk {
    pub marker: String,
    pub text: String,
    pub page: Option<u32>,
    pub score: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding: {0}")]
    Embedding(EmbedderError),
    #[error("search: {0}")]
    Search(#[from] VectorStoreError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
}
