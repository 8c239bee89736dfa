//! File-backed prompt template loading and hot reload

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{PromptStore, PromptTemplate};

/// Loads prompt templates from a plain-text file, falling back to the
/// built-in template when the file is missing or invalid.
#[derive(Debug, Clone)]
pub struct FilePromptLoader {
    path: PathBuf,
}

impl FilePromptLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the template from disk. Never fails: a missing or invalid file
    /// yields the built-in fallback so the bot keeps answering.
    pub fn load(&self) -> PromptTemplate {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match PromptTemplate::parse(content) {
                Ok(template) => {
                    info!(path = %self.path.display(), "Loaded prompt template");
                    template
                }
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Invalid prompt template, using built-in fallback"
                    );
                    PromptTemplate::fallback()
                }
            },
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not read prompt template, using built-in fallback"
                );
                PromptTemplate::fallback()
            }
        }
    }

    /// Reload from disk into the store. Returns true when the active
    /// template changed.
    pub fn reload_into(&self, store: &PromptStore) -> bool {
        let changed = store.replace(self.load());
        if changed {
            info!(path = %self.path.display(), "Prompt template updated");
        } else {
            debug!(path = %self.path.display(), "Prompt template unchanged");
        }
        changed
    }

    fn modified_at(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
    }
}

/// Spawn a background task that polls the template file's mtime and
/// reloads it into the store when it changes.
pub fn spawn_template_watcher(
    loader: FilePromptLoader,
    store: Arc<PromptStore>,
    poll_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_modified = loader.modified_at();
        let mut ticker = tokio::time::interval(poll_interval);
        // The first tick fires immediately; skip it so startup state counts
        // as already seen.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let modified = loader.modified_at();
            if modified != last_modified {
                last_modified = modified;
                loader.reload_into(&store);
            }
        }
    })
}
