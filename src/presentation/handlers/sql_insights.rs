use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    FileLoader, LlmClient, TableInspectorError, TextSplitter, VectorStore,
};
use crate::application::services::TableInsightError;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct SqlInsightsRequest {
    pub table_name: String,
}

#[derive(Serialize)]
pub struct SqlInsightsResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn status_for(e: &TableInsightError) -> StatusCode {
    match e {
        TableInsightError::InvalidTableName(_) => StatusCode::BAD_REQUEST,
        TableInsightError::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        TableInsightError::TableNotInCatalog(_)
        | TableInsightError::Inspection(TableInspectorError::TableNotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        TableInsightError::Inspection(_) => StatusCode::INTERNAL_SERVER_ERROR,
        TableInsightError::Completion(_) => StatusCode::BAD_GATEWAY,
    }
}

#[tracing::instrument(skip(state, request), fields(table = %request.table_name))]
pub async fn sql_insights_handler<F, L, V, T>(
    State(state): State<AppState<F, L, V, T>>,
    Json(request): Json<SqlInsightsRequest>,
) -> impl IntoResponse
where
    F: FileLoader + 'static,
    L: LlmClient + 'static,
    V: VectorStore + 'static,
    T: TextSplitter + 'static + ?Sized,
{
    match state
        .table_insight_service
        .describe(request.table_name.trim())
        .await
    {
        Ok(message) => (StatusCode::OK, Json(SqlInsightsResponse { message })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Table insight failed");
            (
                status_for(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
