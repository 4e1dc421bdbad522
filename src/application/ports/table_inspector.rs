use async_trait::async_trait;

#[async_trait]
pub trait TableInspector: Send + Sync {
    async fn columns(&self, table: &str) -> Result<Vec<String>, TableInspectorError>;

    async fn sample_rows(
        &self,
        table: &str,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>, TableInspectorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TableInspectorError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("table does not exist: {0}")]
    TableNotFound(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
}
