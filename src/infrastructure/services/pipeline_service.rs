//! Answer pipeline orchestration
//!
//! One query flows cache check -> retrieve -> select context -> generate.
//! Any stage failure resolves to a user-facing apology and the cache is
//! only ever written on the success paths, so transient failures are never
//! replayed to later askers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    AnswerGenerator, AnswerPayload, CacheStats, ContextSelector, PromptStore, ResponseCache,
    SourceRef, VectorSearchGateway,
};

pub const RETRIEVAL_APOLOGY: &str =
    "Sorry, I had trouble searching my knowledge base. Please try again in a moment.";
pub const TIMEOUT_APOLOGY: &str =
    "The AI is taking too long to respond. Please try a simpler question or try again later.";
pub const GENERATION_APOLOGY: &str =
    "Sorry, I had trouble coming up with an answer. Please try again!";

/// Orchestrator tunables.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Passages requested from the vector search gateway.
    pub top_k: u32,
    /// Sampling temperature for generation.
    pub temperature: f32,
    /// Optional prefix prepended to the query before retrieval, used to
    /// steer the embedding toward the bot's domain.
    pub query_prefix: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            temperature: 0.3,
            query_prefix: None,
        }
    }
}

/// How a query was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Served from the fuzzy response cache.
    CacheHit,
    /// Freshly generated from retrieved context.
    Generated,
    /// No passage cleared the relevance bar; deterministic fallback answer.
    InsufficientContext,
    /// Vector search failed; apology, nothing cached.
    RetrievalFailed,
    /// The model failed or timed out; apology, nothing cached.
    GenerationFailed,
}

impl Outcome {
    /// Whether the payload is a real (reproducible) answer rather than an
    /// apology for a transient fault.
    pub fn is_answer(&self) -> bool {
        matches!(self, Self::CacheHit | Self::Generated | Self::InsufficientContext)
    }
}

/// An answer together with how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub payload: AnswerPayload,
    pub outcome: Outcome,
}

/// The retrieval-augmented answer pipeline.
pub struct PipelineService {
    gateway: Arc<dyn VectorSearchGateway>,
    generator: Arc<dyn AnswerGenerator>,
    selector: ContextSelector,
    cache: ResponseCache,
    prompts: Arc<PromptStore>,
    config: PipelineConfig,
}

impl PipelineService {
    pub fn new(
        gateway: Arc<dyn VectorSearchGateway>,
        generator: Arc<dyn AnswerGenerator>,
        selector: ContextSelector,
        cache: ResponseCache,
        prompts: Arc<PromptStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            gateway,
            generator,
            selector,
            cache,
            prompts,
            config,
        }
    }

    /// Answer a query. Never fails: every failure mode resolves to a
    /// user-facing payload.
    pub async fn answer(&self, query: &str) -> AnswerPayload {
        self.answer_detailed(query).await.payload
    }

    /// Answer a query, reporting how the answer was produced.
    pub async fn answer_detailed(&self, query: &str) -> PipelineResult {
        if let Some(payload) = self.cache.lookup(query).await {
            debug!(query, "Answer served from response cache");
            return PipelineResult {
                payload,
                outcome: Outcome::CacheHit,
            };
        }

        let search_query = match &self.config.query_prefix {
            Some(prefix) => format!("{prefix}{query}"),
            None => query.to_string(),
        };

        let passages = match self.gateway.search(&search_query, self.config.top_k).await {
            Ok(passages) => passages,
            Err(e) => {
                warn!(query, error = %e, "Retrieval failed");
                return PipelineResult {
                    payload: AnswerPayload::apology(RETRIEVAL_APOLOGY),
                    outcome: Outcome::RetrievalFailed,
                };
            }
        };

        let selection = self.selector.select(&passages);
        if selection.is_empty() {
            info!(query, retrieved = passages.len(), "No relevant context found");
            let payload = AnswerPayload::insufficient_knowledge();
            // Deterministic outcome, safe to memoize.
            self.cache.store(query, payload.clone()).await;
            return PipelineResult {
                payload,
                outcome: Outcome::InsufficientContext,
            };
        }

        let prompt = self.prompts.current().render(&selection.text, query);

        let answer = match self.generator.generate(&prompt, self.config.temperature).await {
            Ok(answer) => answer,
            Err(e) if e.is_timeout() => {
                warn!(query, error = %e, "Generation timed out");
                return PipelineResult {
                    payload: AnswerPayload::apology(TIMEOUT_APOLOGY),
                    outcome: Outcome::GenerationFailed,
                };
            }
            Err(e) => {
                warn!(query, error = %e, "Generation failed");
                return PipelineResult {
                    payload: AnswerPayload::apology(GENERATION_APOLOGY),
                    outcome: Outcome::GenerationFailed,
                };
            }
        };

        let sources = selection
            .passages
            .iter()
            .map(|p| SourceRef::new(&p.title, &p.url, p.similarity()))
            .collect();

        let payload = AnswerPayload {
            answer,
            sources,
            context_used: selection.passages.len(),
        };

        self.cache.store(query, payload.clone()).await;
        info!(query, context_used = payload.context_used, "Answer generated");

        PipelineResult {
            payload,
            outcome: Outcome::Generated,
        }
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}

impl std::fmt::Debug for PipelineService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
