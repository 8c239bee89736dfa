//! Context selection for prompt assembly
//!
//! Converts the ranked passage list returned by the vector search gateway
//! into prompt-ready context text under a character budget, discarding
//! low-relevance passages along the way.

use serde::Deserialize;

use crate::domain::passage::Passage;

/// Separator placed between formatted passage blocks.
const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Marker appended to a truncated passage block.
const ELLIPSIS: &str = "...";

/// Context selection parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Maximum number of passages that reach the prompt.
    pub top_n: usize,
    /// Character ceiling for the assembled context.
    pub max_context_chars: usize,
    /// Minimum `1 - distance` similarity for a passage to survive.
    pub relevance_threshold: f32,
    /// Smallest remaining budget worth filling with a truncated block.
    pub min_fragment_chars: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            top_n: 3,
            max_context_chars: 2000,
            relevance_threshold: 0.1,
            min_fragment_chars: 200,
        }
    }
}

impl SelectorConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_max_context_chars(mut self, chars: usize) -> Self {
        self.max_context_chars = chars;
        self
    }

    pub fn with_relevance_threshold(mut self, threshold: f32) -> Self {
        self.relevance_threshold = threshold;
        self
    }

    pub fn with_min_fragment_chars(mut self, chars: usize) -> Self {
        self.min_fragment_chars = chars;
        self
    }
}

/// The packed context string and the passages that actually made it in.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedContext {
    pub text: String,
    pub passages: Vec<Passage>,
}

impl SelectedContext {
    fn empty() -> Self {
        Self {
            text: String::new(),
            passages: Vec::new(),
        }
    }

    /// True when no passage survived selection.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

/// Filters and truncates ranked passages into a bounded prompt context.
#[derive(Debug, Clone, Default)]
pub struct ContextSelector {
    config: SelectorConfig,
}

impl ContextSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Select passages for the prompt.
    ///
    /// Input passages must be ordered by decreasing relevance, as the
    /// gateway returns them. The budget is counted in characters, not
    /// bytes or tokens, so behavior is reproducible across tokenizers.
    pub fn select(&self, passages: &[Passage]) -> SelectedContext {
        let survivors: Vec<&Passage> = passages
            .iter()
            .filter(|p| p.similarity() > self.config.relevance_threshold)
            .take(self.config.top_n)
            .collect();

        if survivors.is_empty() {
            return SelectedContext::empty();
        }

        let mut blocks: Vec<String> = Vec::new();
        let mut included: Vec<Passage> = Vec::new();
        let mut total_chars = 0usize;

        for (i, passage) in survivors.iter().enumerate() {
            let block = format!("[Source {}: {}]\n{}", i + 1, passage.title, passage.content);
            let block_chars = block.chars().count();

            if total_chars + block_chars > self.config.max_context_chars {
                let remaining = self.config.max_context_chars - total_chars;
                if remaining > self.config.min_fragment_chars {
                    blocks.push(truncate_block(&block, remaining));
                    included.push((*passage).clone());
                }
                // Passages past the first overflow are never considered.
                break;
            }

            blocks.push(block);
            included.push((*passage).clone());
            total_chars += block_chars;
        }

        SelectedContext {
            text: blocks.join(BLOCK_SEPARATOR),
            passages: included,
        }
    }
}

/// Truncate a formatted block to `budget` characters including the
/// ellipsis marker.
fn truncate_block(block: &str, budget: usize) -> String {
    let keep = budget.saturating_sub(ELLIPSIS.chars().count());
    let mut truncated: String = block.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
