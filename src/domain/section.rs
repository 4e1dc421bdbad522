use super::Marker;

/// A finalized output record of the splitting pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub document_title: String,
    pub marker: Marker,
    pub content: String,
    pub page: Option<u32>,
}

impl Section {
    pub fn new(
        document_title: impl Into<String>,
        marker: Marker,
        content: String,
        page: Option<u32>,
    ) -> Self {
        Self {
            document_title: document_title.into(),
            marker,
            content,
            page,
        }
    }
}
