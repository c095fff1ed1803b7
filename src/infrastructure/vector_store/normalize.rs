//! Normalization of text-protocol query responses
//!
//! The `result` field of a query response comes in three shapes depending on
//! the server version:
//!
//! - (a) `{"points": [point, ...]}`
//! - (b) `[point, ...]`
//! - (c) a single `point`
//!
//! Each shape is a complete decode attempt, tried in that order.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::retrieval::{assign_ranks, RetrievalResult};
use crate::domain::vector_store::SearchError;

/// Wrapper keys that hold the primitive inside a typed value, in lookup order
const WRAPPER_FIELDS: &[&str] = &[
    "stringValue",
    "string",
    "value",
    "integerValue",
    "doubleValue",
    "boolValue",
];

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PointsEnvelope {
    points: Vec<RawPoint>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    payload: Option<Map<String, Value>>,
}

/// Decoded `result` field
#[derive(Debug)]
enum ResultShape {
    Points(Vec<RawPoint>),
    List(Vec<RawPoint>),
    Single(RawPoint),
    Empty,
}

impl ResultShape {
    fn decode(result: Value) -> Result<Self, SearchError> {
        let mut empty_envelope = false;

        match serde_json::from_value::<PointsEnvelope>(result.clone()) {
            Ok(envelope) if !envelope.points.is_empty() => return Ok(Self::Points(envelope.points)),
            Ok(_) => empty_envelope = true,
            Err(_) => {}
        }

        if let Ok(points) = serde_json::from_value::<Vec<RawPoint>>(result.clone()) {
            return Ok(Self::List(points));
        }

        match serde_json::from_value::<RawPoint>(result) {
            Ok(point) if !point.id.is_null() => Ok(Self::Single(point)),
            _ if empty_envelope => Ok(Self::Empty),
            Ok(_) => Err(SearchError::Decode(
                "result is not a point list, a points object or a point".to_string(),
            )),
            Err(e) => Err(SearchError::Decode(format!("failed to parse result: {}", e))),
        }
    }

    fn into_points(self) -> Vec<RawPoint> {
        match self {
            Self::Points(points) | Self::List(points) => points,
            Self::Single(point) => vec![point],
            Self::Empty => Vec::new(),
        }
    }
}

/// Turn a raw query response body into ranked results
pub fn normalize_query_response(body: &str) -> Result<Vec<RetrievalResult>, SearchError> {
    let response: QueryResponse = serde_json::from_str(body).map_err(|e| {
        SearchError::Decode(format!("failed to unmarshal response: {}, body: {}", e, body))
    })?;

    let points = match response.result {
        None | Some(Value::Null) => Vec::new(),
        Some(result) => ResultShape::decode(result)?.into_points(),
    };

    let mut results: Vec<RetrievalResult> = points.into_iter().map(point_to_result).collect();
    assign_ranks(&mut results);
    Ok(results)
}

fn point_to_result(point: RawPoint) -> RetrievalResult {
    let payload = point.payload.unwrap_or_default();

    let doc_id = Some(payload_string(&payload, "document_id"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| payload_string(&payload, "doc_id"));
    let chunk_id = Some(payload_string(&payload, "chunk_id"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| point_id_string(&point.id));
    let content = payload_string(&payload, "content");

    RetrievalResult::new(chunk_id, point.score)
        .with_doc_id(doc_id)
        .with_content(content)
        .with_metadata(payload)
}

fn payload_string(payload: &Map<String, Value>, key: &str) -> String {
    payload.get(key).map(extract_value).unwrap_or_default()
}

fn point_id_string(id: &Value) -> String {
    match id {
        Value::Null => "null".to_string(),
        other => extract_value(other),
    }
}

/// Reduce a payload value to its textual form
///
/// Typed wrapper objects are unwrapped recursively; anything else that is not
/// a primitive is rendered as JSON.
pub fn extract_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::Object(map) => WRAPPER_FIELDS
            .iter()
            .find_map(|field| map.get(*field))
            .map(extract_value)
            .unwrap_or_else(|| value.to_string()),
        Value::Array(_) => value.to_string(),
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        Some(f) => format!("{:.6}", f),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn points() -> Value {
        json!([
            {"id": 1, "score": 0.91, "payload": {"document_id": "doc-a", "chunk_id": "c-1", "content": "Refunds within 30 days"}},
            {"id": 2, "score": 0.77, "payload": {"doc_id": "doc-b", "content": "Contact support"}},
            {"id": "9b2c0c1e-5a7f-4d1c-9f55-0a6c0f7a8b11", "score": 0.50, "payload": {"document_id": "doc-c", "chunk_id": "c-3", "content": "Shipping"}}
        ])
    }

    fn summary(results: &[RetrievalResult]) -> Vec<(String, String, String, f64, u32)> {
        results
            .iter()
            .map(|r| (r.doc_id.clone(), r.chunk_id.clone(), r.content.clone(), r.score, r.rank))
            .collect()
    }

    #[test]
    fn test_all_shapes_normalize_identically() {
        let with_points = json!({"result": {"points": points()}}).to_string();
        let bare_list = json!({"result": points()}).to_string();

        let a = normalize_query_response(&with_points).unwrap();
        let b = normalize_query_response(&bare_list).unwrap();

        assert_eq!(summary(&a), summary(&b));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_single_point_matches_first_of_list() {
        let first = points()[0].clone();
        let single = json!({"result": first}).to_string();
        let list = json!({"result": [points()[0].clone()]}).to_string();

        let c = normalize_query_response(&single).unwrap();
        let b = normalize_query_response(&list).unwrap();

        assert_eq!(summary(&c), summary(&b));
        assert_eq!(c[0].rank, 1);
    }

    #[test]
    fn test_ranks_follow_store_order() {
        let body = json!({"result": {"points": points()}}).to_string();

        let results = normalize_query_response(&body).unwrap();

        let ranks: Vec<u32> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(results[0].score, 0.91);
        assert!(results.iter().all(|r| r.source == "vector"));
    }

    #[test]
    fn test_missing_chunk_id_uses_point_id() {
        let body = json!({"result": points()}).to_string();

        let results = normalize_query_response(&body).unwrap();

        assert_eq!(results[1].chunk_id, "2");
        assert_eq!(results[1].doc_id, "doc-b");
    }

    #[test]
    fn test_uuid_point_id_fallback() {
        let body = json!({"result": [{"id": "abc-uuid", "score": 0.3, "payload": {}}]}).to_string();

        let results = normalize_query_response(&body).unwrap();

        assert_eq!(results[0].chunk_id, "abc-uuid");
        assert_eq!(results[0].doc_id, "");
    }

    #[test]
    fn test_document_id_preferred_over_doc_id() {
        let body = json!({"result": [{"id": 1, "score": 0.3, "payload": {"document_id": "primary", "doc_id": "secondary"}}]}).to_string();

        let results = normalize_query_response(&body).unwrap();

        assert_eq!(results[0].doc_id, "primary");
    }

    #[test]
    fn test_payload_kept_as_metadata() {
        let body = json!({"result": [{"id": 1, "score": 0.3, "payload": {"page": 4, "content": "x"}}]}).to_string();

        let results = normalize_query_response(&body).unwrap();

        assert_eq!(results[0].metadata.get("page"), Some(&json!(4)));
    }

    #[test]
    fn test_empty_results() {
        for body in [
            json!({"result": {"points": []}}),
            json!({"result": []}),
            json!({"result": null}),
            json!({"status": "ok"}),
        ] {
            let results = normalize_query_response(&body.to_string()).unwrap();
            assert!(results.is_empty(), "expected no results for {}", body);
        }
    }

    #[test]
    fn test_unrecognized_shape_is_decode_error() {
        let err = normalize_query_response(&json!({"result": 42}).to_string()).unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));

        let err =
            normalize_query_response(&json!({"result": {"unexpected": true}}).to_string()).unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = normalize_query_response("<html>").unwrap_err();

        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[test]
    fn test_extract_value_unwraps_typed_wrappers() {
        assert_eq!(extract_value(&json!({"stringValue": "hello"})), "hello");
        assert_eq!(extract_value(&json!({"integerValue": "42"})), "42");
        assert_eq!(extract_value(&json!({"doubleValue": 0.5})), "0.500000");
        assert_eq!(extract_value(&json!({"boolValue": true})), "true");
        assert_eq!(extract_value(&json!({"value": {"stringValue": "nested"}})), "nested");
    }

    #[test]
    fn test_extract_value_wrapper_order() {
        assert_eq!(
            extract_value(&json!({"integerValue": 7, "stringValue": "wins"})),
            "wins"
        );
    }

    #[test]
    fn test_extract_value_primitives() {
        assert_eq!(extract_value(&json!("text")), "text");
        assert_eq!(extract_value(&json!(12)), "12");
        assert_eq!(extract_value(&json!(12.0)), "12");
        assert_eq!(extract_value(&json!(1.25)), "1.250000");
        assert_eq!(extract_value(&json!(false)), "false");
        assert_eq!(extract_value(&Value::Null), "");
    }

    #[test]
    fn test_extract_value_falls_back_to_json() {
        assert_eq!(extract_value(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(extract_value(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_wrapped_payload_fields() {
        let body = json!({"result": [{
            "id": 5,
            "score": 0.8,
            "payload": {
                "document_id": {"stringValue": "doc-w"},
                "chunk_id": {"integerValue": "17"},
                "content": {"stringValue": "wrapped"}
            }
        }]})
        .to_string();

        let results = normalize_query_response(&body).unwrap();

        assert_eq!(results[0].doc_id, "doc-w");
        assert_eq!(results[0].chunk_id, "17");
        assert_eq!(results[0].content, "wrapped");
    }
}
