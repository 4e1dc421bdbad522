use std::sync::Arc;

use crate::application::ports::{
    LlmClient, LlmClientError, Prompt, TableInspector, TableInspectorError,
};
use crate::domain::TableCatalog;

pub const DEFAULT_SAMPLE_ROWS: u32 = 100;

const ANALYST_PROMPT: &str = "You are an expert data analyst who explains SQL tables to \
non-technical readers.";

/// Asks an LLM to describe every column of a catalogued table from its sample rows.
pub struct TableInsightService {
    inspector: Option<Arc<dyn TableInspector>>,
    llm_client: Arc<dyn LlmClient>,
    catalog: TableCatalog,
    sample_rows: u32,
}

impl TableInsightService {
    pub fn new(
        inspector: Option<Arc<dyn TableInspector>>,
        llm_client: Arc<dyn LlmClient>,
        catalog: TableCatalog,
        sample_rows: u32,
    ) -> Self {
        Self {
            inspector,
            llm_client,
            catalog,
            sample_rows,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn describe(&self, table: &str) -> Result<String, TableInsightError> {
        if !is_identifier(table) {
            return Err(TableInsightError::InvalidTableName(table.to_string()));
        }
        let inspector = self
            .inspector
            .as_ref()
            .ok_or(TableInsightError::DatabaseUnavailable)?;
        let description = self
            .catalog
            .description(table)
            .ok_or_else(|| TableInsightError::TableNotInCatalog(table.to_string()))?;

        let columns = inspector
            .columns(table)
            .await
            .map_err(TableInsightError::Inspection)?;
        let rows = inspector
            .sample_rows(table, self.sample_rows)
            .await
            .map_err(TableInsightError::Inspection)?;

        tracing::debug!(columns = columns.len(), rows = rows.len(), "Table sampled");

        let sample = serde_json::Value::Array(rows).to_string();
        let user = format!(
            "You are given the table named {table}. Its description: {description}\n\
             The table has the columns: {columns}.\n\
             Sample rows as JSON: {sample}\n\
             Based on this data, describe what each column is about.",
            columns = columns.join(", "),
        );

        self.llm_client
            .complete(&Prompt::with_system(ANALYST_PROMPT, user))
            .await
            .map_err(TableInsightError::Completion)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, the only table names that reach a query.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, thiserror::Error)]
pub enum TableInsightError {
    #[error("invalid table name: {0}")]
    InvalidTableName(String),
    #[error("database connection is not available")]
    DatabaseUnavailable,
    #[error("table {0} is not in the catalog")]
    TableNotInCatalog(String),
    #[error("inspection: {0}")]
    Inspection(TableInspectorError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
}
