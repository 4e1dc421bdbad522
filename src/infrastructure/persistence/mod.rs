mod pg_pool;
mod pg_table_inspector;
mod qdrant_adapter;
mod table_catalog_loader;

pub use pg_pool::create_pool;
pub use pg_table_inspector::PgTableInspector;
pub use qdrant_adapter::QdrantAdapter;
pub use table_catalog_loader::{CatalogLoadError, load_table_catalog};
