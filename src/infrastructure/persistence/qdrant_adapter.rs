use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType,
    Filter, PointId, PointStruct, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
    VectorsConfig,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{
    CollectionConfig, DistanceMetric, PayloadFieldType, SearchResult, VectorStore, VectorStoreError,
};
use crate::domain::{Chunk, ChunkId, CollectionName, DocumentId, Embedding, Marker};

/// Qdrant-backed store. Every request names its collection, so one adapter serves all
/// users' collections.
pub struct QdrantAdapter {
    client: Arc<Qdrant>,
}

impl QdrantAdapter {
    pub fn new(url: &str) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub fn with_client(client: Arc<Qdrant>) -> Self {
        Self { client }
    }

    fn map_distance_metric(metric: DistanceMetric) -> Distance {
        match metric {
            DistanceMetric::Cosine => Distance::Cosine,
            DistanceMetric::Euclidean => Distance::Euclid,
            DistanceMetric::DotProduct => Distance::Dot,
        }
    }

    fn map_field_type(field_type: PayloadFieldType) -> FieldType {
        match field_type {
            PayloadFieldType::Keyword => FieldType::Keyword,
            PayloadFieldType::Integer => FieldType::Integer,
        }
    }

    fn chunk_payload(chunk: &Chunk) -> HashMap<String, serde_json::Value> {
        let mut payload = HashMap::new();
        payload.insert(
            "document_id".to_string(),
            serde_json::Value::String(chunk.document_id.as_uuid().to_string()),
        );
        payload.insert(
            "marker".to_string(),
            serde_json::Value::Number(chunk.marker.index().into()),
        );
        payload.insert(
            "text".to_string(),
            serde_json::Value::String(chunk.text.clone()),
        );
        payload.insert(
            "page".to_string(),
            chunk
                .page
                .map(|p| serde_json::Value::Number(p.into()))
                .unwrap_or(serde_json::Value::Null),
        );
        payload.insert(
            "token_count".to_string(),
            serde_json::Value::Number((chunk.token_count as u64).into()),
        );
        payload
    }
}

#[async_trait]
impl VectorStore for QdrantAdapter {
    #[instrument(skip(self, config), fields(collection = %collection))]
    async fn ensure_collection(
        &self,
        collection: &CollectionName,
        config: &CollectionConfig,
    ) -> Result<bool, VectorStoreError> {
        let exists = self
            .client
            .collection_exists(collection.as_str())
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;
        if exists {
            return Ok(false);
        }

        let vectors_config = VectorsConfig::from(VectorParamsBuilder::new(
            config.vector_dimensions,
            Self::map_distance_metric(config.distance_metric),
        ));

        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection.as_str()).vectors_config(vectors_config),
            )
            .await
            .map_err(|e| VectorStoreError::CollectionCreationFailed(e.to_string()))?;

        info!(collection = %collection, "collection_created");

        for index in &config.payload_indexes {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    collection.as_str(),
                    &index.field_name,
                    Self::map_field_type(index.field_type),
                ))
                .await
                .map_err(|e| VectorStoreError::PayloadIndexFailed(e.to_string()))?;

            info!(
                collection = %collection,
                field = %index.field_name,
                "payload_index_applied"
            );
        }

        Ok(true)
    }

    #[instrument(skip(self, chunks, embeddings), fields(collection = %collection, count = chunks.len()))]
    async fn upsert(
        &self,
        collection: &CollectionName,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::UpsertFailed(
                "chunks and embeddings count mismatch".to_string(),
            ));
        }

        let points: Vec<PointStruct> = chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(chunk, embedding)| {
                PointStruct::new(
                    PointId::from(chunk.id.as_uuid().to_string()),
                    embedding.values.clone(),
                    Self::chunk_payload(chunk),
                )
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection.as_str(), points).wait(true))
            .await
            .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))?;

        info!(collection = %collection, count = chunks.len(), "points_upserted");
        Ok(())
    }

    #[instrument(skip(self, embedding), fields(collection = %collection, top_k = top_k))]
    async fn search(
        &self,
        collection: &CollectionName,
        embedding: &Embedding,
        top_k: usize,
        document_id: Option<DocumentId>,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let mut request =
            SearchPointsBuilder::new(collection.as_str(), embedding.values.clone(), top_k as u64)
                .with_payload(true);
        if let Some(document_id) = document_id {
            request = request.filter(Filter::must([Condition::matches(
                "document_id",
                document_id.as_uuid().to_string(),
            )]));
        }

        let search_result = self
            .client
            .search_points(request)
            .await
            .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

        let results: Vec<SearchResult> = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;

                let document_id_str = payload.get("document_id")?.as_str()?;
                let document_id = Uuid::parse_str(document_id_str).ok()?;

                let chunk_id = match point.id?.point_id_options? {
                    qdrant_client::qdrant::point_id::PointIdOptions::Uuid(uuid) => {
                        Uuid::parse_str(&uuid).ok()?
                    }
                    qdrant_client::qdrant::point_id::PointIdOptions::Num(_) => return None,
                };

                let marker = payload.get("marker")?.as_integer()?;
                let text = payload.get("text")?.as_str()?.to_string();
                let page = payload
                    .get("page")
                    .and_then(|v| v.as_integer())
                    .map(|v| v as u32);
                let token_count = payload
                    .get("token_count")
                    .and_then(|v| v.as_integer())
                    .unwrap_or_default() as usize;

                let chunk = Chunk {
                    id: ChunkId::from_uuid(chunk_id),
                    document_id: DocumentId::from_uuid(document_id),
                    marker: Marker::new(u32::try_from(marker).ok()?),
                    text,
                    page,
                    token_count,
                };

                Some(SearchResult {
                    chunk,
                    score: point.score,
                })
            })
            .collect();

        Ok(results)
    }
}
