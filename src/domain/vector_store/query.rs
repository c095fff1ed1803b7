//! Similarity query sent to a vector store

/// Named vector field every knowledge base collection indexes into
pub const DEFAULT_VECTOR_NAME: &str = "embedding";

/// One similarity search against a collection
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub collection: String,
    pub vector: Vec<f32>,
    pub vector_name: String,
    pub limit: u64,
    /// `None` means no score floor
    pub score_threshold: Option<f32>,
}

impl VectorQuery {
    pub fn new(collection: impl Into<String>, vector: Vec<f32>, limit: u64) -> Self {
        Self {
            collection: collection.into(),
            vector,
            vector_name: DEFAULT_VECTOR_NAME.to_string(),
            limit,
            score_threshold: None,
        }
    }

    pub fn with_vector_name(mut self, name: impl Into<String>) -> Self {
        self.vector_name = name.into();
        self
    }

    /// Set the score floor; negative thresholds mean "no floor"
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = (threshold >= 0.0).then_some(threshold as f32);
        self
    }
}
