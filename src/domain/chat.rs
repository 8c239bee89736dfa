//! Chat platform client trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::error::DomainError;

/// Interim message posted while an answer is being produced.
pub const THINKING_MESSAGE: &str = "🤔 Thinking...";

/// Outbound client for the chat platform the bot lives in.
///
/// Send failures are recoverable from the pipeline's point of view; the
/// caller decides whether to retry with a fallback message or give up.
#[async_trait]
pub trait ChatClient: Send + Sync + Debug {
    /// Post a message to a conversation. Returns the platform's message id
    /// when the platform reports one.
    async fn send_message(
        &self,
        conversation: &str,
        message: &str,
    ) -> Result<Option<i64>, DomainError>;

    /// Delete a previously posted message.
    async fn delete_message(&self, conversation: &str, message_id: i64)
        -> Result<(), DomainError>;
}
