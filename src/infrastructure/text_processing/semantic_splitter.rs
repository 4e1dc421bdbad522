use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::boundary_parser::parse_boundaries;
use super::section_window::SectionWindow;
use crate::application::ports::{LlmClient, Prompt, TextSplitter, TextSplitterError};
use crate::domain::{
    ContentType, Document, Marker, MarkerSequence, Section, TextBlock, Unit, units_from_blocks,
};

const BOUNDARY_INSTRUCTIONS: &str = "Instructions: split the excerpt above into sections by \
content. Every paragraph starts with a marker such as 【0†source】. Reply with the markers \
that open a new section, not merely a new paragraph, as a list of strings named `sections` \
inside a code block, for example:\n```python\nsections = ['【3†source】', '【9†source】']\n```";

/// What happens to units still pending when the document ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailPolicy {
    /// Emit them as one more section.
    #[default]
    Separate,
    /// Append them to the previous section when there is one.
    MergeIntoLast,
}

#[derive(Debug, Clone)]
pub struct SectionSplitterConfig {
    pub docx_group_size: usize,
    pub pdf_group_size: usize,
    pub min_section_chars: usize,
    pub max_expansions: u32,
    pub tail_policy: TailPolicy,
    pub section_joiner: String,
}

impl Default for SectionSplitterConfig {
    fn default() -> Self {
        Self {
            docx_group_size: 150,
            pdf_group_size: 40,
            min_section_chars: 128,
            max_expansions: 8,
            tail_policy: TailPolicy::Separate,
            section_joiner: "\n".to_string(),
        }
    }
}

impl SectionSplitterConfig {
    pub fn group_size(&self, content_type: ContentType) -> usize {
        match content_type {
            ContentType::Pdf => self.pdf_group_size,
            ContentType::Docx | ContentType::Text => self.docx_group_size,
        }
    }
}

/// Bounded retries for transient completion failures, with doubling backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(500))
    }
}

/// Splits a document into sections at boundaries chosen by an LLM.
///
/// Units are fed through a [`SectionWindow`]. Whenever the window fills up, or the
/// document runs out, the excerpt is sent to the model and the returned markers are
/// reconciled against the pending units: a candidate section is finalized at a matching
/// boundary only when it already holds more than `min_section_chars` characters,
/// otherwise it keeps growing. An unusable answer or an empty list widens the window for
/// the rest of the document. Whatever is still pending at the end becomes the final
/// section, so a document always splits once the model answers.
pub struct SemanticSplitter {
    llm_client: Arc<dyn LlmClient>,
    config: SectionSplitterConfig,
    retry_policy: RetryPolicy,
}

impl SemanticSplitter {
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        config: SectionSplitterConfig,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            llm_client,
            config,
            retry_policy,
        }
    }

    async fn request_boundaries(&self, excerpt: &str) -> Result<String, TextSplitterError> {
        let prompt = Prompt::user(format!("{excerpt}\n\n{BOUNDARY_INSTRUCTIONS}")).temperature(0.0);
        let mut backoff = self.retry_policy.initial_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.llm_client.complete(&prompt).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.retry_policy.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.retry_policy.max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Boundary request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(e) if e.is_transient() => {
                    return Err(TextSplitterError::LlmUnavailable {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                Err(e) => return Err(TextSplitterError::Completion(e)),
            }
        }
    }

    /// Finalizes sections from `pending` and returns how many leading units they used.
    fn reconcile(
        &self,
        pending: &[Unit],
        boundaries: &[Marker],
        output: &mut SectionAssembler,
    ) -> usize {
        let boundaries = boundaries_within(pending, boundaries);
        let mut expected = boundaries.iter().peekable();
        let mut candidate_start = 0;
        let mut candidate_chars = 0;

        for (idx, unit) in pending.iter().enumerate() {
            let Some(&&boundary) = expected.peek() else {
                break;
            };
            if unit.marker == boundary {
                if idx > candidate_start && candidate_chars > self.config.min_section_chars {
                    output.push(&pending[candidate_start..idx]);
                    candidate_start = idx;
                    candidate_chars = 0;
                }
                expected.next();
            }
            candidate_chars += unit.char_len();
        }

        candidate_start
    }
}

/// Keeps the boundaries that name a pending unit, in strictly increasing order.
fn boundaries_within(pending: &[Unit], boundaries: &[Marker]) -> Vec<Marker> {
    let mut kept: Vec<Marker> = Vec::with_capacity(boundaries.len());
    for &marker in boundaries {
        let present = pending
            .binary_search_by_key(&marker, |unit| unit.marker)
            .is_ok();
        let ascending = kept.last().is_none_or(|last| *last < marker);
        if present && ascending {
            kept.push(marker);
        }
    }
    kept
}

struct SectionAssembler {
    document_title: String,
    joiner: String,
    markers: MarkerSequence,
    sections: Vec<Section>,
}

impl SectionAssembler {
    fn new(document_title: &str, joiner: &str) -> Self {
        Self {
            document_title: document_title.to_string(),
            joiner: joiner.to_string(),
            markers: MarkerSequence::new(),
            sections: Vec::new(),
        }
    }

    fn join(&self, units: &[Unit]) -> String {
        units
            .iter()
            .map(|unit| unit.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.joiner)
    }

    fn push(&mut self, units: &[Unit]) {
        let content = self.join(units);
        let page = units.first().and_then(|unit| unit.page);
        let marker = self.markers.next_marker();
        self.sections
            .push(Section::new(self.document_title.clone(), marker, content, page));
    }

    fn push_tail(&mut self, units: &[Unit], policy: TailPolicy) {
        if units.is_empty() {
            return;
        }
        match (policy, self.sections.is_empty()) {
            (TailPolicy::MergeIntoLast, false) => {
                let tail = self.join(units);
                if let Some(last) = self.sections.last_mut() {
                    last.content.push_str(&self.joiner);
                    last.content.push_str(&tail);
                }
            }
            _ => self.push(units),
        }
    }

    fn finish(self) -> Vec<Section> {
        self.sections
    }
}

#[async_trait]
impl TextSplitter for SemanticSplitter {
    #[tracing::instrument(skip(self, document, blocks), fields(filename = %document.filename))]
    async fn split(
        &self,
        document: &Document,
        blocks: &[TextBlock],
    ) -> Result<Vec<Section>, TextSplitterError> {
        let units = units_from_blocks(blocks);
        let mut window = SectionWindow::new(&units, self.config.group_size(document.content_type));
        let mut output = SectionAssembler::new(&document.filename, &self.config.section_joiner);
        let mut expansions = 0;

        while window.admit() {
            if !window.is_full() && !window.all_admitted() {
                continue;
            }

            loop {
                let response = self.request_boundaries(&window.excerpt()).await?;
                match parse_boundaries(&response) {
                    Some(boundaries) if !boundaries.is_empty() => {
                        let used = self.reconcile(window.pending(), &boundaries, &mut output);
                        window.evict(used);
                        break;
                    }
                    Some(_) => {
                        expansions += 1;
                        window.expand();
                        tracing::debug!(
                            expansions,
                            capacity = window.capacity(),
                            "Empty boundary list, widening window"
                        );
                        break;
                    }
                    None => {
                        expansions += 1;
                        window.expand();
                        tracing::warn!(
                            expansions,
                            capacity = window.capacity(),
                            "No section boundaries in response, widening window"
                        );
                        if !window.all_admitted() {
                            break;
                        }
                        if expansions > self.config.max_expansions {
                            tracing::warn!(
                                pending = window.pending().len(),
                                "Giving up on boundaries, pending units form the final section"
                            );
                            break;
                        }
                    }
                }
            }
        }

        output.push_tail(window.pending(), self.config.tail_policy);
        let sections = output.finish();
        tracing::debug!(
            units = units.len(),
            sections = sections.len(),
            "Document split into sections"
        );
        Ok(sections)
    }
}
