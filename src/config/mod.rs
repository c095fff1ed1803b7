//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CatalogConfig, EmbeddingConfig, LogFormat, LoggingConfig, ServerConfig,
    VectorStoreConfig,
};
