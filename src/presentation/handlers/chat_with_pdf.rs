use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{FileLoader, LlmClient, TextSplitter, VectorStore};
use crate::domain::{CollectionName, DocumentId};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub pdf_id: String,
    pub user_question: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<SourceChunk>,
}

#[derive(Serialize)]
pub struct SourceChunk {
    pub marker: String,
    pub text: String,
    pub page: Option<u32>,
    pub score: f32,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Answers a question from the sections of one document in the user's collection.
#[tracing::instrument(skip(state, request), fields(user_id = %request.user_id, pdf_id = %request.pdf_id))]
pub async fn chat_with_pdf_handler<F, L, V, T>(
    State(state): State<AppState<F, L, V, T>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse
where
    F: FileLoader + 'static,
    L: LlmClient + 'static,
    V: VectorStore + 'static,
    T: TextSplitter + 'static + ?Sized,
{
    if request.user_id.trim().is_empty()
        || request.pdf_id.trim().is_empty()
        || request.user_question.trim().is_empty()
    {
        return bad_request("user_id, pdf_id and user_question are required");
    }
    let Some(collection) = CollectionName::sanitize(&request.user_id) else {
        return bad_request("user_id must contain letters, digits or underscores");
    };
    let Ok(pdf_id) = Uuid::parse_str(request.pdf_id.trim()) else {
        return bad_request("pdf_id must be a document uuid");
    };

    tracing::debug!(question = %sanitize_prompt(&request.user_question), "Processing chat");

    match state
        .retrieval_service
        .query(
            &request.user_question,
            &collection,
            Some(DocumentId::from_uuid(pdf_id)),
        )
        .await
    {
        Ok(response) => {
            tracing::info!(sources_count = response.sources.len(), "Chat answered");
            let sources = response
                .sources
                .into_iter()
                .map(|s| SourceChunk {
                    marker: s.marker,
                    text: s.text,
                    page: s.page,
                    score: s.score,
                })
                .collect();

            (
                StatusCode::OK,
                Json(ChatResponse {
                    answer: response.answer,
                    sources,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Chat failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Chat failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}
