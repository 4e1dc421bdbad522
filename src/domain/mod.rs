mod chunk;
mod collection_name;
mod document;
mod embedding;
mod marker;
mod section;
mod storage_path;
mod table_catalog;
mod unit;

pub use chunk::{Chunk, ChunkId, DocumentId};
pub use collection_name::CollectionName;
pub use document::{ContentType, Document};
pub use embedding::Embedding;
pub use marker::{Marker, MarkerSequence};
pub use section::Section;
pub use storage_path::StoragePath;
pub use table_catalog::{TableCatalog, TableEntry};
pub use unit::{TextBlock, Unit, units_from_blocks};
