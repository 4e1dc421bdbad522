use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::application::ports::{TableInspector, TableInspectorError};

/// Reads column names and sample rows from PostgreSQL. Table names are bound as query
/// parameters where the catalog allows it and quoted as identifiers where it does not.
pub struct PgTableInspector {
    pool: PgPool,
}

impl PgTableInspector {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[async_trait]
impl TableInspector for PgTableInspector {
    #[instrument(skip(self))]
    async fn columns(&self, table: &str) -> Result<Vec<String>, TableInspectorError> {
        let columns: Vec<String> = sqlx::query_scalar(
            "SELECT column_name::text FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TableInspectorError::QueryFailed(e.to_string()))?;

        if columns.is_empty() {
            return Err(TableInspectorError::TableNotFound(table.to_string()));
        }
        Ok(columns)
    }

    #[instrument(skip(self))]
    async fn sample_rows(
        &self,
        table: &str,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>, TableInspectorError> {
        let query = format!(
            "SELECT row_to_json(t) FROM (SELECT * FROM {} LIMIT $1) AS t",
            quote_identifier(table)
        );

        sqlx::query_scalar::<_, serde_json::Value>(&query)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.code().as_deref() == Some("42P01") => {
                    TableInspectorError::TableNotFound(table.to_string())
                }
                other => TableInspectorError::QueryFailed(other.to_string()),
            })
    }
}
