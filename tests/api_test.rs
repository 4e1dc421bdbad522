mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bytes::Bytes;
use serde_json::{Value, json};
use tower::ServiceExt;

use docsense::application::ports::{LlmClientError, SearchResult, StagingStore, TableInspector};
use docsense::application::services::{IngestionService, RetrievalService, TableInsightService};
use docsense::domain::{
    Chunk, ContentType, DocumentId, Marker, StoragePath, TableCatalog, TableEntry,
};
use docsense::infrastructure::storage::LocalStagingStore;
use docsense::infrastructure::text_processing::{
    RetryPolicy, SectionSplitterConfig, SemanticSplitter,
};
use docsense::presentation::{AppState, create_router};

use common::{
    InMemoryVectorStore, MockEmbedder, MockFileLoader, MockTableInspector, ScriptedLlmClient,
    boundary_response,
};

const TEST_TOP_K: usize = 5;
const TEST_MAX_CONTEXT_TOKENS: usize = 1000;
const MULTIPART_BOUNDARY: &str = "docsense-test-boundary";

struct TestApp {
    router: Router,
    llm: Arc<ScriptedLlmClient>,
    store: Arc<InMemoryVectorStore>,
    staging: Arc<LocalStagingStore>,
}

fn create_test_app(
    llm: ScriptedLlmClient,
    store: InMemoryVectorStore,
    inspector: Option<Arc<dyn TableInspector>>,
) -> TestApp {
    let llm = Arc::new(llm);
    let store = Arc::new(store);
    let staging = Arc::new(LocalStagingStore::in_memory());

    let splitter = Arc::new(SemanticSplitter::new(
        llm.clone(),
        SectionSplitterConfig {
            min_section_chars: 0,
            ..SectionSplitterConfig::default()
        },
        RetryPolicy::new(1, Duration::ZERO),
    ));

    let ingestion_service = Arc::new(IngestionService::new(
        Arc::new(MockFileLoader::new(&[
            "Installation steps.",
            "Configuration options.",
            "Troubleshooting tips.",
        ])),
        Arc::new(MockEmbedder),
        Arc::clone(&store),
        splitter,
    ));

    let retrieval_service = Arc::new(RetrievalService::new(
        Arc::new(MockEmbedder),
        Arc::clone(&llm),
        Arc::clone(&store),
        TEST_TOP_K,
        TEST_MAX_CONTEXT_TOKENS,
    ));

    let mut tables = HashMap::new();
    tables.insert(
        "orders".to_string(),
        TableEntry {
            description: Some("Customer orders".to_string()),
        },
    );
    let table_insight_service = Arc::new(TableInsightService::new(
        inspector,
        llm.clone(),
        TableCatalog::new(tables),
        10,
    ));

    let state = AppState {
        ingestion_service,
        retrieval_service,
        table_insight_service,
        staging_store: staging.clone(),
    };

    TestApp {
        router: create_router(state),
        llm,
        store,
        staging,
    }
}

fn default_app() -> TestApp {
    create_test_app(
        ScriptedLlmClient::default(),
        InMemoryVectorStore::default(),
        None,
    )
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         {content}\r\n\
         --{MULTIPART_BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/api/upload_doc")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn stage_docx(app: &TestApp) -> (DocumentId, StoragePath) {
    let id = DocumentId::new();
    let path = StoragePath::new(&id, ContentType::Docx);
    app.staging
        .put(&path, Bytes::from_static(b"docx bytes"))
        .await
        .unwrap();
    (id, path)
}

#[tokio::test]
async fn given_health_endpoint_when_called_then_returns_healthy() {
    let app = default_app();

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn given_request_id_header_when_called_then_it_is_echoed() {
    let app = default_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trace-me-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me-42");
}

#[tokio::test]
async fn given_pdf_upload_when_posting_then_file_is_staged_under_its_uuid() {
    let app = default_app();

    let response = app
        .router
        .oneshot(upload_request("manual.pdf", "%PDF-1.7 fake"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let file_uuid = body["file_uuid"].as_str().unwrap().to_string();
    let storage_path = body["storage_path"].as_str().unwrap().to_string();
    assert_eq!(storage_path, format!("documents/{file_uuid}.pdf"));

    let staged = app
        .staging
        .fetch(&StoragePath::from_raw(storage_path))
        .await
        .unwrap();
    assert_eq!(staged, b"%PDF-1.7 fake");
}

#[tokio::test]
async fn given_unsupported_extension_when_uploading_then_returns_415() {
    let app = default_app();

    let response = app
        .router
        .oneshot(upload_request("notes.txt", "plain"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn given_staged_docx_when_splitting_then_sections_are_stored_under_its_id() {
    let app = create_test_app(
        ScriptedLlmClient::answering([boundary_response(&[0, 1])]),
        InMemoryVectorStore::default(),
        None,
    );
    let (id, path) = stage_docx(&app).await;

    let response = app
        .router
        .oneshot(json_request(
            "/api/split_doc",
            json!({"collection_name": "team-a", "doc_path": path.to_string()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sections"], 2);
    assert_eq!(body["document_id"], id.as_uuid().to_string());

    let chunks = app.store.chunks("teama");
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "Installation steps.");
    assert_eq!(
        chunks[1].text,
        "Configuration options.\nTroubleshooting tips."
    );
    assert!(chunks.iter().all(|c| c.document_id == id));
    assert_eq!(app.llm.calls(), 1);
}

#[tokio::test]
async fn given_missing_staged_file_when_splitting_then_returns_404() {
    let app = default_app();
    let path = StoragePath::new(&DocumentId::new(), ContentType::Pdf);

    let response = app
        .router
        .oneshot(json_request(
            "/api/split_doc",
            json!({"collection_name": "team", "doc_path": path.to_string()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_unknown_document_type_when_splitting_then_returns_415() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request(
            "/api/split_doc",
            json!({"collection_name": "team", "doc_path": "documents/slides.pptx"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn given_unusable_collection_name_when_splitting_then_returns_400() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request(
            "/api/split_doc",
            json!({"collection_name": "@@@", "doc_path": "documents/a.pdf"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_llm_timing_out_when_splitting_then_returns_503_and_stores_nothing() {
    let app = create_test_app(
        ScriptedLlmClient::new(vec![Err(LlmClientError::Timeout)]),
        InMemoryVectorStore::default(),
        None,
    );
    let (_, path) = stage_docx(&app).await;

    let response = app
        .router
        .oneshot(json_request(
            "/api/split_doc",
            json!({"collection_name": "team", "doc_path": path.to_string()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(app.store.chunks("team").is_empty());
}

#[tokio::test]
async fn given_chat_request_when_answered_then_returns_answer_with_sources() {
    let pdf_id = DocumentId::new();
    let store = InMemoryVectorStore::with_results(vec![SearchResult {
        chunk: Chunk::new(
            pdf_id,
            Marker::new(2),
            "Reset the device by holding the button.".to_string(),
            Some(7),
            9,
        ),
        score: 0.42,
    }]);
    let app = create_test_app(ScriptedLlmClient::answering(["Hold the button."]), store, None);

    let response = app
        .router
        .oneshot(json_request(
            "/api/chat_with_pdf",
            json!({
                "user_id": "alice",
                "pdf_id": pdf_id.as_uuid().to_string(),
                "user_question": "How do I reset it?"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["answer"], "Hold the button.");
    assert_eq!(body["sources"][0]["marker"], "【2†source】");
    assert_eq!(body["sources"][0]["page"], 7);
    assert_eq!(app.store.search_filters(), vec![Some(pdf_id)]);
}

#[tokio::test]
async fn given_empty_question_when_chatting_then_returns_400() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request(
            "/api/chat_with_pdf",
            json!({
                "user_id": "alice",
                "pdf_id": DocumentId::new().as_uuid().to_string(),
                "user_question": "   "
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_malformed_pdf_id_when_chatting_then_returns_400() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request(
            "/api/chat_with_pdf",
            json!({"user_id": "alice", "pdf_id": "not-a-uuid", "user_question": "hi?"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_no_database_when_requesting_sql_insights_then_returns_503() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request(
            "/api/sql_insights",
            json!({"table_name": "orders"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn given_uncatalogued_table_when_requesting_sql_insights_then_returns_404() {
    let inspector: Arc<dyn TableInspector> = Arc::new(MockTableInspector::new(&["id"], Vec::new()));
    let app = create_test_app(
        ScriptedLlmClient::default(),
        InMemoryVectorStore::default(),
        Some(inspector),
    );

    let response = app
        .router
        .oneshot(json_request(
            "/api/sql_insights",
            json!({"table_name": "customers"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_catalogued_table_when_requesting_sql_insights_then_returns_llm_message() {
    let inspector: Arc<dyn TableInspector> = Arc::new(MockTableInspector::new(
        &["id", "total"],
        vec![json!({"id": 1, "total": 3.5})],
    ));
    let app = create_test_app(
        ScriptedLlmClient::answering(["total is the order amount."]),
        InMemoryVectorStore::default(),
        Some(inspector),
    );

    let response = app
        .router
        .oneshot(json_request(
            "/api/sql_insights",
            json!({"table_name": "orders"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "total is the order amount."
    );
}

#[tokio::test]
async fn given_injection_attempt_when_requesting_sql_insights_then_returns_400() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_request(
            "/api/sql_insights",
            json!({"table_name": "orders; DROP TABLE orders"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
