//! Application state for shared services

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{AnswerPayload, ChatClient, PromptStore, QaCache};
use crate::infrastructure::prompt::FilePromptLoader;
use crate::infrastructure::services::{Outcome, PipelineService};

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PipelineService>,
    /// Persistent exact-match cache; None when disabled.
    pub qa_cache: Option<Arc<dyn QaCache>>,
    /// Outbound chat client; None when the chat platform is not configured.
    pub chat: Option<Arc<dyn ChatClient>>,
    pub prompt_loader: Arc<FilePromptLoader>,
    pub prompts: Arc<PromptStore>,
    pub bot_name: String,
    /// HMAC secret for webhook signatures; None accepts unsigned requests.
    pub webhook_secret: Option<String>,
}

impl AppState {
    /// Answer a query with the persistent cache in front of the pipeline.
    ///
    /// The persistent cache only serves exact (normalized) matches and is
    /// only written for freshly generated answers; apologies and the
    /// insufficient-knowledge fallback never reach disk. Returns the
    /// payload and whether any cache supplied it.
    pub async fn answer_with_persistence(&self, query: &str) -> (AnswerPayload, bool) {
        if let Some(qa) = &self.qa_cache {
            if let Err(e) = qa.log_query(query).await {
                debug!(error = %e, "Could not log query");
            }

            match qa.get(query).await {
                Ok(Some(hit)) => {
                    debug!(query, access_count = hit.access_count, "Persistent cache hit");
                    return (hit.payload, true);
                }
                Ok(None) => {}
                Err(e) => warn!(query, error = %e, "Persistent cache lookup failed"),
            }
        }

        let result = self.pipeline.answer_detailed(query).await;

        if result.outcome == Outcome::Generated {
            if let Some(qa) = &self.qa_cache {
                if let Err(e) = qa.put(query, &result.payload).await {
                    warn!(query, error = %e, "Could not persist answer");
                }
            }
        }

        (result.payload, result.outcome == Outcome::CacheHit)
    }
}
