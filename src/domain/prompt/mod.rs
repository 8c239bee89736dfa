//! Prompt templates and the hot-reloadable template store

pub mod store;
pub mod template;

pub use store::PromptStore;
pub use template::{PromptTemplate, TemplateError, CONTEXT_PLACEHOLDER, QUERY_PLACEHOLDER};
