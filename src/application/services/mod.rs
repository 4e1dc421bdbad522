mod batch_split_service;
mod ingestion_service;
mod retrieval_service;
mod table_insight_service;
mod token_counter;

pub use batch_split_service::{
    BatchReport, BatchSplitService, DocumentOutcome, FailureStage, SourceDocument,
};
pub use ingestion_service::{IngestionError, IngestionReport, IngestionService};
pub use retrieval_service::{
    NO_CONTEXT_ANSWER, QueryResponse, RetrievalError, RetrievalService, SourceChunk,
};
pub use table_insight_service::{
    DEFAULT_SAMPLE_ROWS, TableInsightError, TableInsightService, is_identifier,
};
pub use token_counter::{TiktokenCounter, TokenCounter, WhitespaceCounter, count_tokens};
