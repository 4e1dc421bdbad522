use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{LlmClient, TextSplitter};
use crate::application::services::TiktokenCounter;
use crate::presentation::config::{ChunkingSettings, ChunkingStrategy};

use super::{
    RetryPolicy, SectionSplitterConfig, SemanticSplitter, TokenChunkSplitter, TokenPartitioner,
};

pub struct TextSplitterFactory;

impl TextSplitterFactory {
    pub fn create(
        strategy: ChunkingStrategy,
        settings: &ChunkingSettings,
        llm_client: Arc<dyn LlmClient>,
    ) -> Arc<dyn TextSplitter> {
        match strategy {
            ChunkingStrategy::Semantic => {
                let config = SectionSplitterConfig {
                    docx_group_size: settings.docx_group_size,
                    pdf_group_size: settings.pdf_group_size,
                    min_section_chars: settings.min_section_chars,
                    max_expansions: settings.max_expansions,
                    tail_policy: settings.tail_policy,
                    section_joiner: settings.section_joiner.clone(),
                };
                let retry_policy = RetryPolicy::new(
                    settings.llm_max_attempts,
                    Duration::from_millis(settings.llm_initial_backoff_ms),
                );
                Arc::new(SemanticSplitter::new(llm_client, config, retry_policy))
            }
            ChunkingStrategy::Token => {
                let partitioner =
                    TokenPartitioner::new(Arc::new(TiktokenCounter), settings.token_limit);
                Arc::new(TokenChunkSplitter::new(
                    partitioner,
                    settings.overlap_fraction,
                ))
            }
        }
    }
}
