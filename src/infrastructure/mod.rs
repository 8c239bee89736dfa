//! Infrastructure layer - External integrations and services

pub mod http_client;
pub mod llm;
pub mod logging;
pub mod nextcloud;
pub mod prompt;
pub mod qa_cache;
pub mod services;
pub mod vector_search;
