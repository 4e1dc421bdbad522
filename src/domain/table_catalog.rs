use std::collections::HashMap;

use serde::Deserialize;

const MISSING_DESCRIPTION: &str = "This table has no description.";

/// Human-written descriptions of the tables the insight endpoint may inspect.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TableCatalog {
    tables: HashMap<String, TableEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableEntry {
    #[serde(default)]
    pub description: Option<String>,
}

impl TableCatalog {
    pub fn new(tables: HashMap<String, TableEntry>) -> Self {
        Self { tables }
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn description(&self, table: &str) -> Option<&str> {
        self.tables.get(table).map(|entry| {
            entry
                .description
                .as_deref()
                .unwrap_or(MISSING_DESCRIPTION)
        })
    }
}
