//! Infrastructure services

mod retrieval_service;

pub use retrieval_service::{RetrievalService, RetrievalServiceTrait};

#[cfg(test)]
pub use retrieval_service::MockRetrievalServiceTrait;
