use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use docsense::application::ports::{LlmClient, StagingStore, TableInspector};
use docsense::application::services::{IngestionService, RetrievalService, TableInsightService};
use docsense::domain::TableCatalog;
use docsense::infrastructure::llm::{OpenAiClient, OpenAiEmbedder};
use docsense::infrastructure::observability::{TracingConfig, init_tracing};
use docsense::infrastructure::persistence::{
    PgTableInspector, QdrantAdapter, create_pool, load_table_catalog,
};
use docsense::infrastructure::storage::LocalStagingStore;
use docsense::infrastructure::text_processing::{CompositeFileLoader, TextSplitterFactory};
use docsense::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (settings, environment) = Settings::load().context("Failed to load settings")?;

    let tracing_config = TracingConfig::default()
        .with_settings(&settings.logging.level, settings.logging.enable_json);
    init_tracing(&tracing_config);
    tracing::info!(%environment, "Starting docsense");

    let llm_client =
        Arc::new(OpenAiClient::new(&settings.llm).context("Failed to build LLM client")?);
    let embedder = Arc::new(OpenAiEmbedder::new(
        &settings.embeddings.base_url,
        settings.embeddings.api_key.clone(),
        settings.embeddings.model.clone(),
    ));
    let vector_store =
        Arc::new(QdrantAdapter::new(&settings.qdrant.url).context("Failed to connect to Qdrant")?);
    let file_loader = Arc::new(CompositeFileLoader::with_default_adapters());

    let splitter_client: Arc<dyn LlmClient> = llm_client.clone();
    let text_splitter = TextSplitterFactory::create(
        settings.chunking.strategy,
        &settings.chunking,
        splitter_client.clone(),
    );
    tracing::info!(strategy = ?settings.chunking.strategy, "Text splitter configured");

    let staging_store: Arc<dyn StagingStore> = match &settings.storage.local_path {
        Some(path) => Arc::new(LocalStagingStore::new(PathBuf::from(path))?),
        None => {
            tracing::warn!("No staging directory configured, uploads are kept in memory");
            Arc::new(LocalStagingStore::in_memory())
        }
    };

    let table_inspector: Option<Arc<dyn TableInspector>> = match &settings.database.url {
        Some(url) => match create_pool(url, settings.database.max_connections).await {
            Ok(pool) => Some(Arc::new(PgTableInspector::new(pool))),
            Err(e) => {
                tracing::error!(error = %e, "Database unavailable, SQL insights disabled");
                None
            }
        },
        None => None,
    };
    let catalog = load_catalog_or_empty(Path::new(&settings.database.catalog_path));

    let ingestion_service = Arc::new(IngestionService::new(
        Arc::clone(&file_loader),
        embedder.clone(),
        Arc::clone(&vector_store),
        text_splitter,
    ));

    let retrieval_service = Arc::new(RetrievalService::new(
        embedder,
        Arc::clone(&llm_client),
        Arc::clone(&vector_store),
        settings.retrieval.top_k,
        settings.retrieval.max_context_tokens,
    ));

    let table_insight_service = Arc::new(TableInsightService::new(
        table_inspector,
        splitter_client,
        catalog,
        settings.database.sample_rows,
    ));

    let state = AppState {
        ingestion_service,
        retrieval_service,
        table_insight_service,
        staging_store,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_catalog_or_empty(path: &Path) -> TableCatalog {
    match load_table_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(error = %e, "Table catalog unavailable, every table will be rejected");
            TableCatalog::default()
        }
    }
}
