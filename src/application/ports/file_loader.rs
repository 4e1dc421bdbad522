use async_trait::async_trait;

use crate::domain::{Document, TextBlock};

#[async_trait]
pub trait FileLoader: Send + Sync {
    /// Returns the document's text blocks in reading order. Non-content artifacts are
    /// either dropped or rendered as image placeholders for the unit builder to skip.
    async fn extract_blocks(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Vec<TextBlock>, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("no text found in {0}")]
    NoTextFound(String),
}
