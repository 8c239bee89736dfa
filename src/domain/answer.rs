//! Answer payloads returned by the pipeline

use serde::{Deserialize, Serialize};

/// Provenance of a passage that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
    /// Similarity score of the passage at retrieval time.
    pub relevance: f32,
}

impl SourceRef {
    pub fn new(title: impl Into<String>, url: impl Into<String>, relevance: f32) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            relevance,
        }
    }
}

/// The complete result of answering one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    /// Number of passages that made it into the generation context.
    pub context_used: usize,
}

impl AnswerPayload {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            context_used: 0,
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceRef>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_context_used(mut self, count: usize) -> Self {
        self.context_used = count;
        self
    }

    /// Deterministic payload for queries with no relevant passages.
    pub fn insufficient_knowledge() -> Self {
        Self::new("I couldn't find any relevant information in my knowledge base.")
    }

    /// User-facing apology for a transient failure.
    pub fn apology(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    /// Render the payload for chat display: the answer plus markdown source
    /// links when any passages contributed.
    pub fn format_for_chat(&self) -> String {
        let mut message = self.answer.clone();

        if !self.sources.is_empty() {
            message.push_str("\n\n**Sources:**\n");
            for source in &self.sources {
                message.push_str(&format!("• [{}]({})\n", source.title, source.url));
            }
        }

        message
    }
}
