//! Domain layer - Core business logic and entities

pub mod answer;
pub mod cache;
pub mod chat;
pub mod context;
pub mod error;
pub mod generation;
pub mod passage;
pub mod prompt;
pub mod retrieval;
pub mod storage;

pub use answer::{AnswerPayload, SourceRef};
pub use cache::{CacheConfig, CacheStats, ResponseCache};
pub use chat::{ChatClient, THINKING_MESSAGE};
pub use context::{ContextSelector, SelectedContext, SelectorConfig};
pub use error::DomainError;
pub use generation::AnswerGenerator;
pub use passage::Passage;
pub use prompt::{PromptStore, PromptTemplate, TemplateError};
pub use retrieval::VectorSearchGateway;
pub use storage::{CachedAnswer, QaCache, QaCacheStats};
