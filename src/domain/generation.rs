//! Answer generator trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::error::DomainError;

/// Gateway to the external language model.
#[async_trait]
pub trait AnswerGenerator: Send + Sync + Debug {
    /// Generate text from a fully assembled prompt.
    ///
    /// Fails with [`DomainError::GenerationTimeout`] when the deadline is
    /// exceeded and [`DomainError::Generation`] for any other transport or
    /// protocol failure.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, DomainError>;
}
