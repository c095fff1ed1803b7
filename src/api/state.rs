//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::RetrievalServiceTrait;

/// Application state shared by every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub retrieval_service: Arc<dyn RetrievalServiceTrait>,
}

impl AppState {
    pub fn new(retrieval_service: Arc<dyn RetrievalServiceTrait>) -> Self {
        Self { retrieval_service }
    }
}
