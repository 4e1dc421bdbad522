use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{
    FileLoader, FileLoaderError, LlmClient, StagingStoreError, TextSplitter, TextSplitterError,
    VectorStore,
};
use crate::application::services::IngestionError;
use crate::domain::{CollectionName, ContentType, Document, DocumentId, StoragePath};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct SplitDocRequest {
    pub collection_name: String,
    pub doc_path: String,
}

#[derive(Serialize)]
pub struct SplitDocResponse {
    pub message: String,
    pub document_id: String,
    pub sections: usize,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

fn ingestion_status(e: &IngestionError) -> StatusCode {
    match e {
        IngestionError::FileLoading(FileLoaderError::UnsupportedContentType(_)) => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        IngestionError::FileLoading(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IngestionError::Splitting(TextSplitterError::LlmUnavailable { .. }) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        IngestionError::Splitting(_) | IngestionError::Embedding(_) => StatusCode::BAD_GATEWAY,
        IngestionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Splits a staged document into sections and stores them in the named collection.
#[tracing::instrument(skip(state, request), fields(doc_path = %request.doc_path))]
pub async fn split_doc_handler<F, L, V, T>(
    State(state): State<AppState<F, L, V, T>>,
    Json(request): Json<SplitDocRequest>,
) -> impl IntoResponse
where
    F: FileLoader + 'static,
    L: LlmClient + 'static,
    V: VectorStore + 'static,
    T: TextSplitter + 'static + ?Sized,
{
    let Some(collection) = CollectionName::sanitize(&request.collection_name) else {
        return error(
            StatusCode::BAD_REQUEST,
            "collection_name must contain letters, digits or underscores".to_string(),
        );
    };

    let path = StoragePath::from_raw(request.doc_path.trim());
    let Some(content_type) = ContentType::from_path(path.as_str()) else {
        return error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Unsupported document type: {}", path),
        );
    };

    let data = match state.staging_store.fetch(&path).await {
        Ok(data) => data,
        Err(StagingStoreError::NotFound(_)) => {
            return error(StatusCode::NOT_FOUND, format!("Document not found: {}", path));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch staged document");
            return error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch document: {}", e),
            );
        }
    };

    let document_id = Uuid::parse_str(path.file_stem())
        .map(DocumentId::from_uuid)
        .unwrap_or_default();
    let document = Document::with_id(
        document_id,
        path.file_name().to_string(),
        content_type,
        data.len() as u64,
    );

    match state
        .ingestion_service
        .ingest_document(&document, &data, &collection)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(SplitDocResponse {
                message: format!(
                    "Document split into {} sections and stored in {}",
                    report.section_count, collection
                ),
                document_id: report.document_id.as_uuid().to_string(),
                sections: report.section_count,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Document split failed");
            error(ingestion_status(&e), format!("Split failed: {}", e))
        }
    }
}
