//! Binary-protocol (gRPC) vector store client backed by `qdrant-client`

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::qdrant::{self, point_id::PointIdOptions, value::Kind, SearchPointsBuilder};
use qdrant_client::{Qdrant, QdrantError};
use serde_json::{Map, Value};

use crate::domain::retrieval::{assign_ranks, RetrievalResult};
use crate::domain::vector_store::{
    ConnectionTarget, Protocol, SearchError, VectorQuery, VectorStoreClient,
};

/// gRPC status code for an unreachable peer
const GRPC_UNAVAILABLE: i32 = 14;

/// gRPC status code for an expired deadline
const GRPC_DEADLINE_EXCEEDED: i32 = 4;

/// One long-lived gRPC channel to a vector store endpoint
pub struct GrpcVectorStoreClient {
    client: Qdrant,
    endpoint: String,
}

impl std::fmt::Debug for GrpcVectorStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcVectorStoreClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GrpcVectorStoreClient {
    /// Build a client for `target`; the channel connects on first use
    pub fn connect(target: &ConnectionTarget, timeout: Duration) -> Result<Self, SearchError> {
        let endpoint = target.base_url();
        let mut builder = Qdrant::from_url(&endpoint);

        if let Some(api_key) = target.api_key.clone() {
            builder = builder.api_key(api_key);
        }

        let client = builder
            .timeout(timeout)
            .connect_timeout(timeout)
            .skip_compatibility_check()
            .build()
            .map_err(|e| SearchError::Connect(format!("failed to build client for {}: {}", endpoint, e)))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl VectorStoreClient for GrpcVectorStoreClient {
    fn protocol(&self) -> Protocol {
        Protocol::Grpc
    }

    async fn search(&self, query: &VectorQuery) -> Result<Vec<RetrievalResult>, SearchError> {
        let mut builder =
            SearchPointsBuilder::new(&query.collection, query.vector.clone(), query.limit)
                .vector_name(&query.vector_name)
                .with_payload(true);

        if let Some(threshold) = query.score_threshold {
            builder = builder.score_threshold(threshold);
        }

        let response = self
            .client
            .search_points(builder)
            .await
            .map_err(map_qdrant_error)?;

        let mut results: Vec<RetrievalResult> =
            response.result.into_iter().map(scored_point_to_result).collect();
        assign_ranks(&mut results);
        Ok(results)
    }
}

fn map_qdrant_error(error: QdrantError) -> SearchError {
    match error {
        QdrantError::ResponseError { status } => {
            map_status(status.code() as i32, status.message())
        }
        other => SearchError::Connect(other.to_string()),
    }
}

fn map_status(code: i32, message: &str) -> SearchError {
    if code == GRPC_UNAVAILABLE || code == GRPC_DEADLINE_EXCEEDED {
        SearchError::Connect(message.to_string())
    } else {
        SearchError::BadStatus {
            status: code as u16,
            body: message.to_string(),
        }
    }
}

fn scored_point_to_result(point: qdrant::ScoredPoint) -> RetrievalResult {
    let payload = point.payload;

    let doc_id = Some(payload_string(&payload, "document_id"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| payload_string(&payload, "doc_id"));
    let chunk_id = Some(payload_string(&payload, "chunk_id"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| point_id_string(point.id.as_ref()));
    let content = payload_string(&payload, "content");

    let metadata: Map<String, Value> = payload
        .into_iter()
        .map(|(key, value)| (key, value_to_json(value)))
        .collect();

    RetrievalResult::new(chunk_id, point.score as f64)
        .with_doc_id(doc_id)
        .with_content(content)
        .with_metadata(metadata)
}

fn point_id_string(id: Option<&qdrant::PointId>) -> String {
    match id.and_then(|id| id.point_id_options.as_ref()) {
        Some(PointIdOptions::Num(n)) => n.to_string(),
        Some(PointIdOptions::Uuid(uuid)) => uuid.clone(),
        None => "null".to_string(),
    }
}

fn payload_string(payload: &HashMap<String, qdrant::Value>, key: &str) -> String {
    payload.get(key).map(value_to_string).unwrap_or_default()
}

/// Stringify a typed payload value; unrecognized kinds render as JSON
fn value_to_string(value: &qdrant::Value) -> String {
    match &value.kind {
        Some(Kind::StringValue(s)) => s.clone(),
        Some(Kind::IntegerValue(i)) => i.to_string(),
        Some(Kind::DoubleValue(d)) => format!("{:.6}", d),
        Some(Kind::BoolValue(b)) => b.to_string(),
        Some(Kind::NullValue(_)) | None => String::new(),
        Some(_) => value_to_json(value.clone()).to_string(),
    }
}

fn value_to_json(value: qdrant::Value) -> Value {
    match value.kind {
        Some(Kind::NullValue(_)) | None => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::Number(i.into()),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(d)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::StructValue(s)) => Value::Object(
            s.fields
                .into_iter()
                .map(|(key, value)| (key, value_to_json(value)))
                .collect(),
        ),
        Some(Kind::ListValue(list)) => {
            Value::Array(list.values.into_iter().map(value_to_json).collect())
        }
    }
}
