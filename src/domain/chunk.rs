use uuid::Uuid;

use super::{Marker, Section};

/// A section prepared for the vector store.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub id: ChunkId,
    pub document_id: DocumentId,
    pub marker: Marker,
    pub text: String,
    pub page: Option<u32>,
    pub token_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(Uuid);

impl ChunkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ChunkId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    pub fn new(
        document_id: DocumentId,
        marker: Marker,
        text: String,
        page: Option<u32>,
        token_count: usize,
    ) -> Self {
        Self {
            id: ChunkId::new(),
            document_id,
            marker,
            text,
            page,
            token_count,
        }
    }

    pub fn from_section(document_id: DocumentId, section: Section, token_count: usize) -> Self {
        Self::new(
            document_id,
            section.marker,
            section.content,
            section.page,
            token_count,
        )
    }
}
