//! Application configuration

pub mod app_config;

pub use app_config::{
    AppConfig, BotConfig, LlmConfig, LogFormat, LoggingConfig, NextcloudConfig, PromptConfig,
    QaCacheConfig, ServerConfig, VectorSearchConfig,
};
