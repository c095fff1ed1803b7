//! Retrieval results and the response envelope

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::request::{EffectiveSearch, FusionMethod, RetrievalMode};

/// Source tag for results produced by semantic (vector) search
pub const SOURCE_VECTOR: &str = "vector";

/// Source tag for results produced by fusing several rankings
pub const SOURCE_HYBRID: &str = "hybrid";

/// One ranked hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub doc_id: String,
    pub chunk_id: String,
    pub content: String,
    pub score: f64,
    /// 1-based position within the call that produced this result
    pub rank: u32,
    pub source: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RetrievalResult {
    pub fn new(chunk_id: impl Into<String>, score: f64) -> Self {
        Self {
            doc_id: String::new(),
            chunk_id: chunk_id.into(),
            content: String::new(),
            score,
            rank: 0,
            source: SOURCE_VECTOR.to_string(),
            metadata: Map::new(),
        }
    }

    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = doc_id.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Assign ranks 1..=n in the current order
pub fn assign_ranks(results: &mut [RetrievalResult]) {
    for (index, result) in results.iter_mut().enumerate() {
        result.rank = index as u32 + 1;
    }
}

/// Effective settings echoed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub retrieval_mode: RetrievalMode,
    pub top_k: u32,
    pub score_threshold: f64,
    pub fusion_method: FusionMethod,
    pub semantic_weight: f64,
    pub keyword_weight: f64,
    pub rrf_k: u32,
}

impl From<&EffectiveSearch> for SearchConfig {
    fn from(search: &EffectiveSearch) -> Self {
        Self {
            retrieval_mode: search.mode,
            top_k: search.top_k,
            score_threshold: search.score_threshold,
            fusion_method: search.fusion_method,
            semantic_weight: search.semantic_weight,
            keyword_weight: search.keyword_weight,
            rrf_k: search.rrf_k,
        }
    }
}

/// Response payload of a unified search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<RetrievalResult>,
    pub config: SearchConfig,
    pub message: String,
}

impl SearchResponse {
    pub fn new(search: &EffectiveSearch, results: Vec<RetrievalResult>) -> Self {
        let message = format!(
            "{} retrieval completed: {} results",
            search.mode,
            results.len()
        );
        Self {
            query: search.query.clone(),
            config: SearchConfig::from(search),
            results,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retrieval::SearchRequest;

    #[test]
    fn test_assign_ranks_starts_at_one() {
        let mut results = vec![
            RetrievalResult::new("a", 0.9),
            RetrievalResult::new("b", 0.8),
            RetrievalResult::new("c", 0.7),
        ];

        assign_ranks(&mut results);

        let ranks: Vec<u32> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_response_message_has_mode_and_count() {
        let search = SearchRequest::new("kb-1", "refund policy")
            .into_effective()
            .unwrap();

        let response = SearchResponse::new(
            &search,
            vec![RetrievalResult::new("a", 0.9), RetrievalResult::new("b", 0.8)],
        );

        assert_eq!(response.message, "semantic retrieval completed: 2 results");
        assert_eq!(response.query, "refund policy");
        assert_eq!(response.config.top_k, 10);
    }

    #[test]
    fn test_config_serializes_lowercase_enums() {
        let search = SearchRequest::new("kb-1", "q").into_effective().unwrap();

        let json = serde_json::to_value(SearchConfig::from(&search)).unwrap();

        assert_eq!(json["retrieval_mode"], "semantic");
        assert_eq!(json["fusion_method"], "rrf");
        assert_eq!(json["rrf_k"], 60);
    }

    #[test]
    fn test_new_result_is_vector_sourced() {
        let result = RetrievalResult::new("c-1", 0.5).with_doc_id("d-1");

        assert_eq!(result.source, SOURCE_VECTOR);
        assert_eq!(result.doc_id, "d-1");
        assert!(result.metadata.is_empty());
    }
}
