use std::path::Path;

use crate::domain::TableCatalog;

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read table catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid table catalog {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Loads the JSON table catalog, `{ "<table>": { "description": "..." } }`.
pub fn load_table_catalog(path: &Path) -> Result<TableCatalog, CatalogLoadError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogLoadError::Parse {
        path: display,
        source,
    })
}
