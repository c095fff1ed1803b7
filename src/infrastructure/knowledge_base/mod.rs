//! Knowledge base catalog implementations

mod catalog;

pub use catalog::JsonKnowledgeBaseCatalog;
