use serde::Deserialize;

use crate::domain::{CacheConfig, SelectorConfig};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub bot: BotConfig,
    pub nextcloud: NextcloudConfig,
    pub llm: LlmConfig,
    pub vector_search: VectorSearchConfig,
    pub context: SelectorConfig,
    pub cache: CacheConfig,
    pub qa_cache: QaCacheConfig,
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Bot identity, used for self-message detection and mention stripping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub name: String,
}

/// Nextcloud Talk connection. All fields optional: without them the bot
/// still serves the HTTP API, it just cannot reply in chat.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NextcloudConfig {
    pub url: Option<String>,
    pub bot_token: Option<String>,
    /// HMAC secret shared with Talk for webhook signatures.
    pub shared_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Falls back to the XAI_API_KEY environment variable when unset.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorSearchConfig {
    pub base_url: String,
    pub top_k: u32,
    pub timeout_secs: u64,
    /// Optional prefix prepended to queries before embedding.
    pub query_prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QaCacheConfig {
    pub enabled: bool,
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub template_path: String,
    /// Poll the template file and hot-reload it when it changes.
    pub watch: bool,
    pub watch_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8111,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "Minecraft Bot".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.x.ai/v1".to_string(),
            model: "grok-4-fast-non-reasoning".to_string(),
            temperature: 0.3,
            max_tokens: 1500,
            timeout_secs: 60,
        }
    }
}

impl Default for VectorSearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            top_k: 5,
            timeout_secs: 10,
            query_prefix: None,
        }
    }
}

impl Default for QaCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_url: "sqlite://qa_cache.db?mode=rwc".to_string(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template_path: "prompt_template.txt".to_string(),
            watch: true,
            watch_interval_secs: 5,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8111);
        assert_eq!(config.cache.capacity, 50);
        assert!((config.cache.similarity_threshold - 0.85).abs() < 1e-9);
        assert_eq!(config.context.top_n, 3);
        assert_eq!(config.context.max_context_chars, 2000);
        assert_eq!(config.llm.timeout_secs, 60);
        assert!(config.qa_cache.enabled);
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": {"port": 9000},
            "cache": {"capacity": 10}
        }))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cache.capacity, 10);
        assert!((config.cache.similarity_threshold - 0.85).abs() < 1e-9);
    }
}
