//! Persistent exact-match QA cache trait
//!
//! Unlike the in-memory fuzzy cache, this survives restarts and only
//! matches queries that normalize identically. It sits in front of the
//! pipeline at the chat surface; the pipeline itself never touches it.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;

use super::answer::AnswerPayload;
use super::error::DomainError;

/// A previously persisted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnswer {
    pub payload: AnswerPayload,
    /// Times this entry has been served, including this retrieval.
    pub access_count: i64,
}

/// Counters for the persistent cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QaCacheStats {
    pub cached_answers: i64,
    pub total_hits: i64,
}

#[async_trait]
pub trait QaCache: Send + Sync + Debug {
    /// Fetch the answer cached for a query that normalizes identically,
    /// bumping its access counters.
    async fn get(&self, query: &str) -> Result<Option<CachedAnswer>, DomainError>;

    /// Persist (or replace) the answer for a query.
    async fn put(&self, query: &str, payload: &AnswerPayload) -> Result<(), DomainError>;

    /// Record that a query was asked, for popularity statistics.
    async fn log_query(&self, query: &str) -> Result<(), DomainError>;

    async fn stats(&self) -> Result<QaCacheStats, DomainError>;

    async fn clear(&self) -> Result<(), DomainError>;
}
