//! Unified search request and its effective (defaulted) form

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::DomainError;

pub const DEFAULT_TOP_K: u32 = 10;
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.7;
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.3;
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.0;

/// How results are retrieved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    #[default]
    Semantic,
    Keyword,
    Hybrid,
}

impl RetrievalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Keyword => "keyword",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetrievalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semantic" => Ok(Self::Semantic),
            "keyword" => Ok(Self::Keyword),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!("unsupported retrieval mode: {}", other)),
        }
    }
}

/// How hybrid rankings are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionMethod {
    #[default]
    Rrf,
    Weighted,
}

impl FusionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rrf => "rrf",
            Self::Weighted => "weighted",
        }
    }
}

impl fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FusionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rrf" => Ok(Self::Rrf),
            "weighted" => Ok(Self::Weighted),
            other => Err(format!("unsupported fusion method: {}", other)),
        }
    }
}

/// Inbound unified search request
///
/// Optional fields left out (or sent as empty strings / zero) take their
/// defaults in [`SearchRequest::into_effective`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(custom(function = "not_blank", message = "kb_id is required"))]
    pub kb_id: String,
    #[validate(custom(function = "not_blank", message = "query is required"))]
    pub query: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub retrieval_mode: Option<RetrievalMode>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub score_threshold: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub fusion_method: Option<FusionMethod>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0, message = "semantic_weight must be within [0, 1]"))]
    pub semantic_weight: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0, message = "keyword_weight must be within [0, 1]"))]
    pub keyword_weight: Option<f64>,
    #[serde(default)]
    pub rrf_k: Option<u32>,
}

impl SearchRequest {
    pub fn new(kb_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            kb_id: kb_id.into(),
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: RetrievalMode) -> Self {
        self.retrieval_mode = Some(mode);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    /// Validate the request and apply defaults
    pub fn into_effective(self) -> Result<EffectiveSearch, DomainError> {
        self.validate()
            .map_err(|e| DomainError::validation(validation_message(&e)))?;

        Ok(EffectiveSearch {
            kb_id: self.kb_id,
            query: self.query,
            mode: self.retrieval_mode.unwrap_or_default(),
            top_k: self.top_k.filter(|k| *k > 0).unwrap_or(DEFAULT_TOP_K),
            score_threshold: self.score_threshold.unwrap_or(DEFAULT_SCORE_THRESHOLD),
            fusion_method: self.fusion_method.unwrap_or_default(),
            semantic_weight: self.semantic_weight.unwrap_or(DEFAULT_SEMANTIC_WEIGHT),
            keyword_weight: self.keyword_weight.unwrap_or(DEFAULT_KEYWORD_WEIGHT),
            rrf_k: self.rrf_k.filter(|k| *k > 0).unwrap_or(DEFAULT_RRF_K),
        })
    }
}

/// A validated request with every default resolved
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSearch {
    pub kb_id: String,
    pub query: String,
    pub mode: RetrievalMode,
    pub top_k: u32,
    pub score_threshold: f64,
    pub fusion_method: FusionMethod,
    pub semantic_weight: f64,
    pub keyword_weight: f64,
    pub rrf_k: u32,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> Result<SearchRequest, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_defaults_applied() {
        let request = parse(serde_json::json!({"kb_id": "kb-1", "query": "refund policy"})).unwrap();

        let effective = request.into_effective().unwrap();

        assert_eq!(effective.mode, RetrievalMode::Semantic);
        assert_eq!(effective.top_k, 10);
        assert_eq!(effective.fusion_method, FusionMethod::Rrf);
        assert_eq!(effective.rrf_k, 60);
        assert_eq!(effective.semantic_weight, 0.7);
        assert_eq!(effective.keyword_weight, 0.3);
        assert_eq!(effective.score_threshold, 0.0);
    }

    #[test]
    fn test_zero_top_k_defaults_to_ten() {
        let effective = SearchRequest::new("kb-1", "q")
            .with_top_k(0)
            .into_effective()
            .unwrap();

        assert_eq!(effective.top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn test_explicit_top_k_kept() {
        let effective = SearchRequest::new("kb-1", "q")
            .with_top_k(3)
            .into_effective()
            .unwrap();

        assert_eq!(effective.top_k, 3);
    }

    #[test]
    fn test_empty_mode_string_defaults_to_semantic() {
        let request = parse(serde_json::json!({
            "kb_id": "kb-1",
            "query": "q",
            "retrieval_mode": "",
            "fusion_method": ""
        }))
        .unwrap();

        let effective = request.into_effective().unwrap();

        assert_eq!(effective.mode, RetrievalMode::Semantic);
        assert_eq!(effective.fusion_method, FusionMethod::Rrf);
    }

    #[test]
    fn test_unknown_mode_rejected_at_decode() {
        let err = parse(serde_json::json!({
            "kb_id": "kb-1",
            "query": "q",
            "retrieval_mode": "fuzzy"
        }))
        .unwrap_err();

        assert!(err.to_string().contains("unsupported retrieval mode: fuzzy"));
    }

    #[test]
    fn test_unknown_fusion_method_rejected() {
        let err = parse(serde_json::json!({
            "kb_id": "kb-1",
            "query": "q",
            "fusion_method": "borda"
        }))
        .unwrap_err();

        assert!(err.to_string().contains("unsupported fusion method: borda"));
    }

    #[test]
    fn test_missing_required_fields_rejected_at_decode() {
        assert!(parse(serde_json::json!({"query": "q"})).is_err());
        assert!(parse(serde_json::json!({"kb_id": "kb-1"})).is_err());
    }

    #[test]
    fn test_empty_required_fields_fail_validation() {
        let err = SearchRequest::new("", "").into_effective().unwrap_err();

        match err {
            DomainError::Validation { message } => {
                assert!(message.contains("kb_id is required"));
                assert!(message.contains("query is required"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_only_fields_fail_validation() {
        let err = SearchRequest::new("   ", "\t\n").into_effective().unwrap_err();

        match err {
            DomainError::Validation { message } => {
                assert!(message.contains("kb_id is required"));
                assert!(message.contains("query is required"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_weight_out_of_range_fails_validation() {
        let mut request = SearchRequest::new("kb-1", "q");
        request.semantic_weight = Some(1.5);

        let err = request.into_effective().unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_negative_threshold_passes_through() {
        let effective = SearchRequest::new("kb-1", "q")
            .with_score_threshold(-1.0)
            .into_effective()
            .unwrap();

        assert_eq!(effective.score_threshold, -1.0);
    }

    #[test]
    fn test_mode_round_trips_as_lowercase() {
        assert_eq!(
            serde_json::to_string(&RetrievalMode::Hybrid).unwrap(),
            "\"hybrid\""
        );
        assert_eq!("keyword".parse::<RetrievalMode>(), Ok(RetrievalMode::Keyword));
    }
}
