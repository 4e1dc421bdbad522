use super::{Marker, MarkerSequence};

const IMAGE_PLACEHOLDER_PREFIX: &str = "<image: ";

/// One block of extracted document text, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub page: Option<u32>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            text: text.into(),
            page,
        }
    }

    pub fn image_placeholder(name: &str) -> Self {
        Self::new(format!("{IMAGE_PLACEHOLDER_PREFIX}{name}>"), None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub marker: Marker,
    pub text: String,
    pub page: Option<u32>,
}

impl Unit {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The line this unit contributes to an LLM excerpt.
    pub fn tagged_line(&self) -> String {
        format!("{} {}", self.marker, self.text)
    }
}

/// Trims blocks, drops empty ones and image placeholders, and tags the rest with
/// markers from a fresh sequence.
pub fn units_from_blocks(blocks: &[TextBlock]) -> Vec<Unit> {
    let mut markers = MarkerSequence::new();
    blocks
        .iter()
        .filter_map(|block| {
            let text = block.text.trim();
            if text.is_empty() || text.starts_with(IMAGE_PLACEHOLDER_PREFIX) {
                return None;
            }
            Some(Unit {
                marker: markers.next_marker(),
                text: text.to_string(),
                page: block.page,
            })
        })
        .collect()
}
