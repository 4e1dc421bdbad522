use std::fmt;
use std::sync::Arc;

use crate::application::ports::{FileLoader, SectionSink, TextSplitter, TextSplitterError};
use crate::domain::{ContentType, Document};

/// A document waiting to be split, already read into memory.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub content_type: ContentType,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Extraction,
    RetriesExhausted,
    Upstream,
    Sink,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Extraction => "extraction",
            Self::RetriesExhausted => "retries exhausted",
            Self::Upstream => "upstream",
            Self::Sink => "sink",
        };
        f.write_str(stage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Split {
        filename: String,
        sections: usize,
    },
    Failed {
        filename: String,
        stage: FailureStage,
        message: String,
    },
}

impl DocumentOutcome {
    pub fn failed(
        filename: impl Into<String>,
        stage: FailureStage,
        message: impl fmt::Display,
    ) -> Self {
        Self::Failed {
            filename: filename.into(),
            stage,
            message: message.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(DocumentOutcome::is_failure)
    }

    pub fn section_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                DocumentOutcome::Split { sections, .. } => *sections,
                DocumentOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

/// Splits documents one after another into a shared sink. A document's sections reach
/// the sink only once the whole document has split, handed over in a single
/// [`SectionSink::write_document`] call.
pub struct BatchSplitService<F: ?Sized, T: ?Sized>
where
    F: FileLoader,
    T: TextSplitter,
{
    file_loader: Arc<F>,
    text_splitter: Arc<T>,
}

impl<F: ?Sized, T: ?Sized> BatchSplitService<F, T>
where
    F: FileLoader,
    T: TextSplitter,
{
    pub fn new(file_loader: Arc<F>, text_splitter: Arc<T>) -> Self {
        Self {
            file_loader,
            text_splitter,
        }
    }

    pub async fn run<S>(&self, documents: Vec<SourceDocument>, sink: &mut S) -> BatchReport
    where
        S: SectionSink + ?Sized,
    {
        let mut report = BatchReport::default();
        for document in documents {
            report.outcomes.push(self.process(document, sink).await);
        }
        report
    }

    #[tracing::instrument(skip_all, fields(filename = %source.filename))]
    pub async fn process<S>(&self, source: SourceDocument, sink: &mut S) -> DocumentOutcome
    where
        S: SectionSink + ?Sized,
    {
        let document = Document::new(
            source.filename.clone(),
            source.content_type,
            source.data.len() as u64,
        );

        let blocks = match self.file_loader.extract_blocks(&source.data, &document).await {
            Ok(blocks) => blocks,
            Err(e) => {
                tracing::error!(error = %e, "Extraction failed");
                return DocumentOutcome::failed(source.filename, FailureStage::Extraction, e);
            }
        };

        let sections = match self.text_splitter.split(&document, &blocks).await {
            Ok(sections) => sections,
            Err(e) => {
                tracing::error!(error = %e, "Splitting failed");
                let stage = match e {
                    TextSplitterError::LlmUnavailable { .. } => FailureStage::RetriesExhausted,
                    TextSplitterError::Completion(_) | TextSplitterError::SplittingFailed(_) => {
                        FailureStage::Upstream
                    }
                };
                return DocumentOutcome::failed(source.filename, stage, e);
            }
        };

        if let Err(e) = sink.write_document(&sections) {
            tracing::error!(error = %e, "Writing sections failed");
            return DocumentOutcome::failed(source.filename, FailureStage::Sink, e);
        }

        tracing::info!(sections = sections.len(), "Document split");
        DocumentOutcome::Split {
            filename: source.filename,
            sections: sections.len(),
        }
    }
}
