mod boundary_parser;
mod composite_file_loader;
mod docx_adapter;
mod pdf_adapter;
mod plain_text_adapter;
mod section_window;
mod semantic_splitter;
mod sentence_splitter;
mod text_sanitizer;
mod text_splitter_factory;
mod token_partitioner;

pub use boundary_parser::parse_boundaries;
pub use composite_file_loader::CompositeFileLoader;
pub use docx_adapter::{DocxAdapter, paragraphs_from_document_xml};
pub use pdf_adapter::PdfAdapter;
pub use plain_text_adapter::PlainTextAdapter;
pub use section_window::SectionWindow;
pub use semantic_splitter::{RetryPolicy, SectionSplitterConfig, SemanticSplitter, TailPolicy};
pub use sentence_splitter::{SentenceSplit, split_sentences};
pub use text_sanitizer::{sanitize_extracted_text, sanitized_paragraphs};
pub use text_splitter_factory::TextSplitterFactory;
pub use token_partitioner::{
    DEFAULT_OVERLAP_FRACTION, Fallback, PartitionLimits, TokenChunkSplitter, TokenPartitioner,
};
