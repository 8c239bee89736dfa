//! Vector search gateway trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::error::DomainError;
use super::passage::Passage;

/// Gateway to the external vector search service.
///
/// Implementations return passages ordered by increasing distance
/// (most relevant first). Embedding and ANN internals are opaque here.
#[async_trait]
pub trait VectorSearchGateway: Send + Sync + Debug {
    /// Search for the `top_k` passages closest to the query.
    async fn search(&self, query: &str, top_k: u32) -> Result<Vec<Passage>, DomainError>;
}
