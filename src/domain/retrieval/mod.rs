//! Retrieval domain - unified search request, results and fusion

mod fusion;
mod request;
mod result;

pub use fusion::{fuse, fuse_rrf, fuse_weighted, FusionParams};
pub use request::{
    EffectiveSearch, FusionMethod, RetrievalMode, SearchRequest, DEFAULT_KEYWORD_WEIGHT,
    DEFAULT_RRF_K, DEFAULT_SCORE_THRESHOLD, DEFAULT_SEMANTIC_WEIGHT, DEFAULT_TOP_K,
};
pub use result::{
    assign_ranks, RetrievalResult, SearchConfig, SearchResponse, SOURCE_HYBRID, SOURCE_VECTOR,
};
