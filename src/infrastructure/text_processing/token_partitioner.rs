use std::sync::Arc;

use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

use super::sentence_splitter::split_sentences;
use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::application::services::TokenCounter;
use crate::domain::{Document, MarkerSequence, Section, TextBlock, units_from_blocks};

pub const DEFAULT_OVERLAP_FRACTION: f32 = 0.34;

/// Finer-grained splits tried, in order, for a unit that alone exceeds the token limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Words,
    Characters,
}

const FALLBACKS: [Fallback; 2] = [Fallback::Words, Fallback::Characters];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionLimits {
    pub tokens: usize,
    pub words: usize,
    pub chars: usize,
}

impl PartitionLimits {
    pub fn from_token_limit(tokens: usize) -> Self {
        let tokens = tokens.max(1);
        Self {
            tokens,
            words: tokens,
            chars: tokens * 4,
        }
    }

    pub fn scaled(&self, fraction: f32) -> Self {
        let scale = |limit: usize| ((limit as f64 * fraction as f64).floor() as usize).max(1);
        let tokens = scale(self.tokens);
        let words = scale(self.words);
        Self {
            tokens,
            words,
            chars: words * 4,
        }
    }
}

/// Greedily packs sentences into chunks that stay within a token budget.
#[derive(Clone)]
pub struct TokenPartitioner {
    counter: Arc<dyn TokenCounter>,
    limits: PartitionLimits,
}

impl TokenPartitioner {
    pub fn new(counter: Arc<dyn TokenCounter>, token_limit: usize) -> Self {
        Self::with_limits(counter, PartitionLimits::from_token_limit(token_limit))
    }

    pub fn with_limits(counter: Arc<dyn TokenCounter>, limits: PartitionLimits) -> Self {
        Self { counter, limits }
    }

    pub fn limits(&self) -> PartitionLimits {
        self.limits
    }

    /// Sentence-splits `text` and packs it with the word and character fallbacks.
    pub fn partition_text(&self, text: &str) -> Vec<String> {
        let split = split_sentences(text);
        self.partition(&split.sentences, &split.separators, &FALLBACKS)
    }

    /// `separators[i - 1]` is glued in front of `units[i]` before counting.
    pub fn partition(
        &self,
        units: &[String],
        separators: &[String],
        fallbacks: &[Fallback],
    ) -> Vec<String> {
        let mut chunks = Vec::new();
        let remainder = self.pack(units, separators, fallbacks, &mut chunks);
        if !remainder.is_empty() {
            chunks.push(remainder);
        }
        chunks
    }

    fn pack(
        &self,
        units: &[String],
        separators: &[String],
        fallbacks: &[Fallback],
        chunks: &mut Vec<String>,
    ) -> String {
        let limit = self.limits.tokens;
        let mut running = String::new();
        let mut running_tokens = 0;

        for (idx, unit) in units.iter().enumerate() {
            let text = match idx.checked_sub(1).and_then(|prev| separators.get(prev)) {
                Some(separator) => format!("{separator}{unit}"),
                None => unit.clone(),
            };
            let tokens = self.counter.count(&text);

            if running_tokens + tokens <= limit {
                running.push_str(&text);
                running_tokens += tokens;
                continue;
            }

            if !running.is_empty() {
                chunks.push(std::mem::take(&mut running));
            }
            running_tokens = 0;

            match fallbacks.split_first() {
                Some((fallback, finer)) if tokens > limit => {
                    let (pieces, joints) = self.fallback_split(&text, *fallback);
                    let remainder = self.pack(&pieces, &joints, finer, chunks);
                    if !remainder.is_empty() {
                        chunks.push(remainder);
                    }
                }
                _ => {
                    running = text;
                    running_tokens = tokens;
                }
            }
        }

        running
    }

    fn fallback_split(&self, text: &str, fallback: Fallback) -> (Vec<String>, Vec<String>) {
        let (pieces, joint): (Vec<String>, &str) = match fallback {
            Fallback::Words => {
                let words: Vec<&str> = text.split(' ').collect();
                let pieces = words
                    .chunks(self.limits.words.max(1))
                    .map(|group| group.join(" "))
                    .collect();
                (pieces, " ")
            }
            Fallback::Characters => {
                let graphemes: Vec<&str> = text.graphemes(true).collect();
                let pieces = graphemes
                    .chunks(self.limits.chars.max(1))
                    .map(|group| group.concat())
                    .collect();
                (pieces, "")
            }
        };
        let joints = vec![joint.to_string(); pieces.len().saturating_sub(1)];
        (pieces, joints)
    }

    /// Appends to every chunk but the last the first sub-chunk of its successor, packed
    /// under the limits scaled by `fraction`. Running it twice duplicates text again.
    pub fn apply_overlap(&self, chunks: &[String], fraction: f32) -> Vec<String> {
        let overlap = Self::with_limits(self.counter.clone(), self.limits.scaled(fraction));
        let mut stitched = chunks.to_vec();
        for (idx, next) in chunks.iter().enumerate().skip(1) {
            if let Some(lead) = overlap.partition_text(next).into_iter().next() {
                stitched[idx - 1].push_str(&lead);
            }
        }
        stitched
    }
}

/// Flat splitting path: token-bounded chunks with overlap instead of LLM boundaries.
pub struct TokenChunkSplitter {
    partitioner: TokenPartitioner,
    overlap_fraction: f32,
}

impl TokenChunkSplitter {
    pub fn new(partitioner: TokenPartitioner, overlap_fraction: f32) -> Self {
        Self {
            partitioner,
            overlap_fraction,
        }
    }
}

#[async_trait]
impl TextSplitter for TokenChunkSplitter {
    async fn split(
        &self,
        document: &Document,
        blocks: &[TextBlock],
    ) -> Result<Vec<Section>, TextSplitterError> {
        let text = units_from_blocks(blocks)
            .into_iter()
            .map(|unit| unit.text)
            .collect::<Vec<_>>()
            .join("\n");

        let chunks = self.partitioner.partition_text(&text);
        let chunks = if self.overlap_fraction > 0.0 {
            self.partitioner.apply_overlap(&chunks, self.overlap_fraction)
        } else {
            chunks
        };

        let mut markers = MarkerSequence::new();
        Ok(chunks
            .into_iter()
            .map(|content| Section::new(&document.filename, markers.next_marker(), content, None))
            .collect())
    }
}
