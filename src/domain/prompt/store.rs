//! Process-wide prompt template store
//!
//! Single-writer, multi-reader holder for the current template. The file
//! watching that drives hot reload lives in the infrastructure layer; the
//! store only offers an atomic read of the current template and an
//! explicit replace.

use std::sync::{Arc, PoisonError, RwLock};

use super::template::PromptTemplate;

#[derive(Debug)]
pub struct PromptStore {
    current: RwLock<Arc<PromptTemplate>>,
}

impl PromptStore {
    pub fn new(template: PromptTemplate) -> Self {
        Self {
            current: RwLock::new(Arc::new(template)),
        }
    }

    /// The template in effect right now.
    pub fn current(&self) -> Arc<PromptTemplate> {
        Arc::clone(
            &self
                .current
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Swap in a new template. Returns true when the content changed.
    pub fn replace(&self, template: PromptTemplate) -> bool {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let changed = **guard != template;
        *guard = Arc::new(template);
        changed
    }
}

impl Default for PromptStore {
    fn default() -> Self {
        Self::new(PromptTemplate::fallback())
    }
}
