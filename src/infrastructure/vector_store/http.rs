//! Text-protocol (HTTP/JSON) vector store client

use async_trait::async_trait;

use super::normalize::normalize_query_response;
use crate::domain::retrieval::RetrievalResult;
use crate::domain::vector_store::{
    ConnectionTarget, Protocol, SearchError, VectorQuery, VectorStoreClient,
};
use crate::infrastructure::http_client::HttpClientTrait;

/// Client for the `/collections/{collection}/points/query` endpoint
#[derive(Debug)]
pub struct HttpVectorStoreClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
    api_key: Option<String>,
}

impl<C: HttpClientTrait> HttpVectorStoreClient<C> {
    pub fn new(client: C, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn for_target(client: C, target: &ConnectionTarget) -> Self {
        Self::new(client, target.base_url(), target.api_key.clone())
    }

    fn query_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/points/query", self.base_url, collection)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(key) = self.api_key.as_deref() {
            headers.push(("api-key", key));
        }
        headers
    }

    fn build_request(query: &VectorQuery) -> serde_json::Value {
        let mut body = serde_json::json!({
            "query": query.vector,
            "using": query.vector_name,
            "limit": query.limit,
            "with_payload": true,
        });

        if let Some(threshold) = query.score_threshold {
            body["score_threshold"] = serde_json::json!(threshold);
        }

        body
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorStoreClient for HttpVectorStoreClient<C> {
    fn protocol(&self) -> Protocol {
        Protocol::Http
    }

    async fn search(&self, query: &VectorQuery) -> Result<Vec<RetrievalResult>, SearchError> {
        let url = self.query_url(&query.collection);
        let body = Self::build_request(query);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| SearchError::Connect(e.to_string()))?;

        if !response.is_success() {
            return Err(SearchError::BadStatus {
                status: response.status,
                body: response.body,
            });
        }

        normalize_query_response(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use crate::infrastructure::http_client::HttpClient;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE: &str = "http://qdrant:6333";
    const QUERY_URL: &str = "http://qdrant:6333/collections/kb-1/points/query";

    fn query() -> VectorQuery {
        VectorQuery::new("kb-1", vec![0.5, 0.25], 3).with_score_threshold(0.2)
    }

    #[tokio::test]
    async fn test_request_body_and_api_key() {
        let client = MockHttpClient::new().with_response(QUERY_URL, serde_json::json!({"result": []}));
        let store = HttpVectorStoreClient::new(client, BASE, Some("secret".into()));

        store.search(&query()).await.unwrap();

        let requests = store.client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].body,
            serde_json::json!({
                "query": [0.5, 0.25],
                "using": "embedding",
                "limit": 3,
                "with_payload": true,
                "score_threshold": 0.2f32
            })
        );
        assert!(requests[0]
            .headers
            .contains(&("api-key".to_string(), "secret".to_string())));
    }

    #[tokio::test]
    async fn test_negative_threshold_omitted() {
        let client = MockHttpClient::new().with_response(QUERY_URL, serde_json::json!({"result": []}));
        let store = HttpVectorStoreClient::new(client, BASE, None);
        let query = VectorQuery::new("kb-1", vec![0.1], 5).with_score_threshold(-1.0);

        store.search(&query).await.unwrap();

        let requests = store.client.requests();
        assert!(requests[0].body.get("score_threshold").is_none());
        assert!(requests[0].headers.iter().all(|(k, _)| k != "api-key"));
    }

    #[tokio::test]
    async fn test_bad_status_keeps_body() {
        let client = MockHttpClient::new().with_raw_response(
            QUERY_URL,
            404,
            r#"{"status":{"error":"Collection `kb-1` doesn't exist!"}}"#,
        );
        let store = HttpVectorStoreClient::new(client, BASE, None);

        let err = store.search(&query()).await.unwrap_err();

        match err {
            SearchError::BadStatus { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("doesn't exist"));
            }
            other => panic!("expected bad status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_connect_error() {
        let client = MockHttpClient::new().with_error(QUERY_URL, "connection refused");
        let store = HttpVectorStoreClient::new(client, BASE, None);

        let err = store.search(&query()).await.unwrap_err();

        assert_eq!(err, SearchError::Connect("connection refused".to_string()));
    }

    #[tokio::test]
    async fn test_for_target_uses_resolved_endpoint() {
        let target = ConnectionTarget {
            host: "qdrant".to_string(),
            port: 6333,
            api_key: None,
            protocol: Protocol::Http,
            tls: false,
        };
        let client = MockHttpClient::new().with_response(QUERY_URL, serde_json::json!({"result": []}));

        let store = HttpVectorStoreClient::for_target(client, &target);

        assert!(store.search(&query()).await.unwrap().is_empty());
        assert_eq!(store.protocol(), Protocol::Http);
    }

    #[tokio::test]
    async fn test_against_live_http_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/collections/kb-1/points/query"))
            .and(header("api-key", "k"))
            .and(body_partial_json(serde_json::json!({"using": "embedding", "limit": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {"points": [
                    {"id": 10, "score": 0.9, "payload": {"document_id": "d1", "chunk_id": "c1", "content": "alpha"}},
                    {"id": 11, "score": 0.6, "payload": {"document_id": "d2", "content": "beta"}}
                ]},
                "status": "ok",
                "time": 0.001
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = HttpVectorStoreClient::new(HttpClient::new(), server.uri(), Some("k".into()));

        let results = store.search(&query()).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk_id, "c1");
        assert_eq!(results[1].chunk_id, "11");
        assert_eq!(results[1].rank, 2);
    }
}
