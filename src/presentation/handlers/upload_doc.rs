use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::{FileLoader, LlmClient, TextSplitter, VectorStore};
use crate::domain::{ContentType, DocumentId, StoragePath};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub file_uuid: String,
    pub storage_path: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

/// Stages an uploaded `.docx` or `.pdf` for a later `split_doc` call.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_doc_handler<F, L, V, T>(
    State(state): State<AppState<F, L, V, T>>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    F: FileLoader + 'static,
    L: LlmClient + 'static,
    V: VectorStore + 'static,
    T: TextSplitter + 'static + ?Sized,
{
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Upload request with no file");
            return error(StatusCode::BAD_REQUEST, "No file uploaded".to_string());
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return error(
                StatusCode::BAD_REQUEST,
                format!("Failed to read multipart: {}", e),
            );
        }
    };

    let filename = field.file_name().unwrap_or("unknown").to_string();
    let content_type = match ContentType::from_path(&filename) {
        Some(ct @ (ContentType::Docx | ContentType::Pdf)) => ct,
        _ => {
            tracing::warn!(filename = %filename, "Rejected upload with unsupported extension");
            return error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Only .docx and .pdf files are accepted, got {}", filename),
            );
        }
    };

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return error(StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e));
        }
    };

    let document_id = DocumentId::new();
    let storage_path = StoragePath::new(&document_id, content_type);

    match state.staging_store.put(&storage_path, data).await {
        Ok(bytes) => {
            tracing::info!(
                document_id = %document_id.as_uuid(),
                filename = %filename,
                bytes,
                "Document staged"
            );
            (
                StatusCode::OK,
                Json(UploadResponse {
                    file_uuid: document_id.as_uuid().to_string(),
                    storage_path: storage_path.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to stage document");
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to store file: {}", e),
            )
        }
    }
}
