// On-demand library loader boundary
//
// Transpiler libraries are fetched the first time they are needed. The first
// successful load of a name is cached and shared by concurrent callers; a
// failed load is not cached, so the next call retries.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Library sources known to the playground
pub const DEFAULT_LIBRARY_URLS: &[(&str, &str)] = &[
    ("babel", "https://unpkg.com/@babel/standalone@7.23.4/babel.min.js"),
    (
        "typescript",
        "https://cdnjs.cloudflare.com/ajax/libs/typescript/5.3.3/typescript.min.js",
    ),
    ("marked", "https://cdnjs.cloudflare.com/ajax/libs/marked/4.2.12/marked.min.js"),
    ("sass", "https://cdnjs.cloudflare.com/ajax/libs/sass.js/0.11.1/sass.sync.min.js"),
];

/// Handle to a loaded library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryHandle {
    pub name: String,
    pub url: String,
}

/// Errors from the library loader
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    /// Name has no configured source
    #[error("Transpiler {0} not defined.")]
    Unknown(String),
    /// The source failed to load
    #[error("Script load error for {url}: {reason}")]
    LoadFailed { url: String, reason: String },
}

/// Fetches a library for the loader; provided by the host
#[async_trait]
pub trait LibrarySource: Send + Sync {
    async fn fetch(&self, name: &str, url: &str) -> Result<LibraryHandle, LoaderError>;
}

/// Idempotent `get(name) -> handle` over a LibrarySource
pub struct LibraryLoader<S: LibrarySource> {
    source: S,
    urls: HashMap<String, String>,
    loaded: Mutex<HashMap<String, Arc<OnceCell<LibraryHandle>>>>,
}

impl<S: LibrarySource> LibraryLoader<S> {
    /// Loader for the default playground libraries
    pub fn new(source: S) -> Self {
        Self::with_urls(
            source,
            DEFAULT_LIBRARY_URLS
                .iter()
                .map(|(name, url)| (name.to_string(), url.to_string())),
        )
    }

    /// Loader for a custom set of name -> url sources
    pub fn with_urls<I>(source: S, urls: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            source,
            urls: urls.into_iter().collect(),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Get a library, loading it on first use
    pub async fn get(&self, name: &str) -> Result<LibraryHandle, LoaderError> {
        let url = self
            .urls
            .get(name)
            .ok_or_else(|| LoaderError::Unknown(name.to_string()))?;

        let cell = {
            let mut loaded = self.loaded.lock();
            Arc::clone(loaded.entry(name.to_string()).or_default())
        };

        let handle = cell
            .get_or_try_init(|| async {
                crate::info!("Loading {} on demand", name);
                self.source.fetch(name, url).await.inspect_err(|e| {
                    crate::error!("Failed to load {} script: {}", name, e);
                })
            })
            .await?;
        Ok(handle.clone())
    }

    /// Whether `name` has been loaded successfully
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded
            .lock()
            .get(name)
            .is_some_and(|cell| cell.initialized())
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
