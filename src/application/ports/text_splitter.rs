use async_trait::async_trait;

use super::LlmClientError;
use crate::domain::{Document, Section, TextBlock};

#[async_trait]
pub trait TextSplitter: Send + Sync {
    async fn split(
        &self,
        document: &Document,
        blocks: &[TextBlock],
    ) -> Result<Vec<Section>, TextSplitterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextSplitterError {
    #[error("llm unavailable after {attempts} attempts: {last_error}")]
    LlmUnavailable {
        attempts: u32,
        last_error: LlmClientError,
    },
    #[error("completion failed: {0}")]
    Completion(LlmClientError),
    #[error("splitting failed: {0}")]
    SplittingFailed(String),
}
