use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, TextBlock};

use super::text_sanitizer::sanitized_paragraphs;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Extracts page text with `pdf_oxide` and splits every page into blank-line separated
/// blocks that remember their 1-based page number.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(path: &std::path::Path) -> Result<Vec<(u32, String)>, FileLoaderError> {
        let mut doc = PdfDocument::open(path)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        let page_count = doc.page_count().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read page count: {e}"))
        })?;

        let mut pages = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            match doc.extract_text(page_index) {
                Ok(text) if !text.trim().is_empty() => {
                    pages.push(((page_index + 1) as u32, text));
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        page = page_index + 1,
                        error = %e,
                        "Skipping unreadable PDF page"
                    );
                }
            }
        }

        Ok(pages)
    }
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract_blocks(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Vec<TextBlock>, FileLoaderError> {
        if document.content_type != ContentType::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let mut temp_file = tempfile::NamedTempFile::new().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to create temp file: {e}"))
        })?;
        temp_file.write_all(data).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to write temp file: {e}"))
        })?;
        let temp_path = temp_file.path().to_path_buf();

        let pages = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || Self::extract_pages(&temp_path)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        let blocks: Vec<TextBlock> = pages
            .iter()
            .flat_map(|(page, text)| {
                sanitized_paragraphs(text)
                    .into_iter()
                    .map(|paragraph| TextBlock::new(paragraph, Some(*page)))
            })
            .collect();

        tracing::info!(
            page_count = pages.len(),
            block_count = blocks.len(),
            "PDF text extraction complete"
        );

        if blocks.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }
        Ok(blocks)
    }
}
