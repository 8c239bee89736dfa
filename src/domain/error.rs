use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Retrieval error: {message}")]
    Retrieval { message: String },

    #[error("Generation timed out after {seconds}s")]
    GenerationTimeout { seconds: u64 },

    #[error("Generation error: {message}")]
    Generation { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Chat transport error: {message}")]
    Chat { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
        }
    }

    pub fn generation_timeout(seconds: u64) -> Self {
        Self::GenerationTimeout { seconds }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn chat(message: impl Into<String>) -> Self {
        Self::Chat {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the failure was a deadline expiry rather than a hard fault.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::GenerationTimeout { .. })
    }
}
