//! Craftbot - Minecraft Wiki Bot for Nextcloud Talk
//!
//! A retrieval-augmented chat bot that answers Minecraft questions from a
//! wiki knowledge base:
//! - Vector search retrieval over an external search service
//! - Context selection under a character budget
//! - Answer generation via the x.ai chat completions API
//! - Fuzzy in-memory response cache plus a persistent SQLite QA cache
//! - Hot-reloadable prompt template
//! - Nextcloud Talk webhook integration with signed deliveries

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::warn;

use api::state::AppState;
use domain::{
    AnswerGenerator, ChatClient, ContextSelector, PromptStore, QaCache, ResponseCache,
    VectorSearchGateway,
};
use infrastructure::http_client::HttpClient;
use infrastructure::llm::XaiGenerator;
use infrastructure::nextcloud::NextcloudTalkClient;
use infrastructure::prompt::FilePromptLoader;
use infrastructure::qa_cache::SqliteQaCache;
use infrastructure::services::{PipelineConfig, PipelineService};
use infrastructure::vector_search::HttpVectorSearch;

/// Wire up the application state from configuration.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let api_key = config
        .llm
        .api_key
        .clone()
        .or_else(|| std::env::var("XAI_API_KEY").ok())
        .context("LLM API key missing: set llm.api_key or XAI_API_KEY")?;

    let generator: Arc<dyn AnswerGenerator> = Arc::new(
        XaiGenerator::new(
            HttpClient::with_timeout(Duration::from_secs(config.llm.timeout_secs)),
            api_key,
            &config.llm.base_url,
            &config.llm.model,
        )
        .with_max_tokens(config.llm.max_tokens),
    );

    let gateway: Arc<dyn VectorSearchGateway> = Arc::new(HttpVectorSearch::new(
        HttpClient::with_timeout(Duration::from_secs(config.vector_search.timeout_secs)),
        &config.vector_search.base_url,
    ));

    let prompt_loader = Arc::new(FilePromptLoader::new(&config.prompt.template_path));
    let prompts = Arc::new(PromptStore::new(prompt_loader.load()));

    let pipeline = Arc::new(PipelineService::new(
        gateway,
        generator,
        ContextSelector::new(config.context.clone()),
        ResponseCache::new(config.cache.clone()),
        Arc::clone(&prompts),
        PipelineConfig {
            top_k: config.vector_search.top_k,
            temperature: config.llm.temperature,
            query_prefix: config.vector_search.query_prefix.clone(),
        },
    ));

    let qa_cache: Option<Arc<dyn QaCache>> = if config.qa_cache.enabled {
        Some(Arc::new(
            SqliteQaCache::connect(&config.qa_cache.database_url).await?,
        ))
    } else {
        None
    };

    let chat: Option<Arc<dyn ChatClient>> =
        match (&config.nextcloud.url, &config.nextcloud.bot_token) {
            (Some(url), Some(token)) => Some(Arc::new(NextcloudTalkClient::new(url, token))),
            _ => {
                warn!("Nextcloud not configured, chat replies disabled");
                None
            }
        };

    Ok(AppState {
        pipeline,
        qa_cache,
        chat,
        prompt_loader,
        prompts,
        bot_name: config.bot.name.clone(),
        webhook_secret: config.nextcloud.shared_secret.clone(),
    })
}
