// Snippet store - persists and loads user-defined snippets
// Snippets keep insertion order; (language, trigger) is unique case-insensitively.
//
// Every mutation changes the in-memory list first and then persists. A failed
// save is reported but the in-memory change stays.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// A user-defined snippet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Unique identifier for the snippet
    pub id: String,
    /// Trigger word typed in the editor (e.g., "log")
    pub trigger: String,
    /// Expansion template, optionally containing one caret marker
    pub template: String,
    /// Language key the snippet applies to (e.g., "javascript")
    pub language: String,
    /// Always true for persisted snippets
    #[serde(default = "default_true")]
    pub is_user_defined: bool,
    /// Disabled snippets stay listed but never expand
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    /// ISO 8601 creation timestamp
    #[serde(default)]
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

/// Partial update for a snippet; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetPatch {
    pub trigger: Option<String>,
    pub template: Option<String>,
    pub language: Option<String>,
    pub is_enabled: Option<bool>,
}

/// Portable form used by export and import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnippetExport {
    pub trigger: String,
    pub template: String,
    pub language: String,
}

impl From<&Snippet> for SnippetExport {
    fn from(snippet: &Snippet) -> Self {
        Self {
            trigger: snippet.trigger.clone(),
            template: snippet.template.clone(),
            language: snippet.language.clone(),
        }
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    /// Why each skipped element was rejected, in artifact order
    #[serde(skip)]
    pub skip_reasons: Vec<SnippetError>,
    /// Set when the imported snippets are only held in memory
    #[serde(skip)]
    pub save_error: Option<SnippetError>,
}

impl ImportSummary {
    /// Whether the durable record is behind the in-memory list
    pub fn is_unsaved(&self) -> bool {
        self.save_error.is_some()
    }
}

/// Error types for snippet operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnippetError {
    /// A required field is missing or empty
    #[error("Snippet data incomplete: {0}")]
    Validation(String),
    /// Trigger already used by another snippet of the same language
    #[error("Trigger '{trigger}' already exists for {language}")]
    Collision { trigger: String, language: String },
    /// Snippet not found
    #[error("Snippet with ID {0} not found")]
    NotFound(String),
    /// Durable write failed; the in-memory change was kept
    #[error("Failed to persist snippets: {0}")]
    Persistence(String),
    /// Import artifact is not a JSON array of snippets
    #[error("Invalid snippet import: {0}")]
    ImportParse(String),
    /// Failed to load snippets
    #[error("Failed to load snippets: {0}")]
    Load(String),
}

/// Durable record behind a SnippetStore
pub trait SnippetBackend: Send {
    /// Read every persisted snippet in stored order
    fn load(&self) -> Result<Vec<Snippet>, SnippetError>;

    /// Replace the persisted record with `snippets`
    fn save(&mut self, snippets: &[Snippet]) -> Result<(), SnippetError>;
}

/// JSON array file with atomic writes
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    /// Path to persistence file
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SnippetBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<Snippet>, SnippetError> {
        crate::debug!("Loading snippets from {:?}", self.path);

        if !self.path.exists() {
            crate::debug!("No snippets file found, starting with empty store");
            return Ok(Vec::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| SnippetError::Load(e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| SnippetError::Load(e.to_string()))
    }

    /// Persist snippets using atomic write (temp file + rename)
    fn save(&mut self, snippets: &[Snippet]) -> Result<(), SnippetError> {
        crate::debug!("Persisting {} snippets to {:?}", snippets.len(), self.path);

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SnippetError::Persistence(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(snippets)
            .map_err(|e| SnippetError::Persistence(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path).map_err(|e| {
                SnippetError::Persistence(format!("Failed to create temp file: {}", e))
            })?;
            file.write_all(content.as_bytes())
                .map_err(|e| SnippetError::Persistence(format!("Failed to write: {}", e)))?;
            file.sync_all()
                .map_err(|e| SnippetError::Persistence(format!("Failed to sync: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            SnippetError::Persistence(format!("Failed to rename: {}", e))
        })?;

        crate::debug!("Snippets persisted successfully");
        Ok(())
    }
}

/// In-process record, for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    saved: Vec<Snippet>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record
    pub fn with_snippets(saved: Vec<Snippet>) -> Self {
        Self { saved }
    }
}

impl SnippetBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<Snippet>, SnippetError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, snippets: &[Snippet]) -> Result<(), SnippetError> {
        self.saved = snippets.to_vec();
        Ok(())
    }
}

/// Store for user snippets backed by a durable record
pub struct SnippetStore {
    /// Snippets in insertion order
    snippets: Vec<Snippet>,
    backend: Box<dyn SnippetBackend>,
}

impl std::fmt::Debug for SnippetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnippetStore")
            .field("snippets", &self.snippets.len())
            .finish()
    }
}

impl SnippetStore {
    /// Create an empty store on top of `backend` (call `load` to read it)
    pub fn new(backend: impl SnippetBackend + 'static) -> Self {
        Self {
            snippets: Vec::new(),
            backend: Box::new(backend),
        }
    }

    /// Store persisted to a JSON file
    pub fn with_file(path: PathBuf) -> Self {
        Self::new(JsonFileBackend::new(path))
    }

    /// Store that only lives in memory
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Load snippets from the durable record, replacing the in-memory list
    pub fn load(&mut self) -> Result<(), SnippetError> {
        let snippets = self.backend.load()?;
        self.snippets = snippets;
        crate::info!("Loaded {} snippets", self.snippets.len());
        Ok(())
    }

    fn save(&mut self) -> Result<(), SnippetError> {
        self.backend.save(&self.snippets).map_err(|e| {
            crate::warn!(
                "Snippet changes kept in memory but not saved ({} snippets): {}",
                self.snippets.len(),
                e
            );
            e
        })
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.snippets.iter().position(|s| s.id == id)
    }

    /// Whether `trigger` is used by another snippet of `language`
    pub fn is_trigger_taken(&self, trigger: &str, language: &str, exclude_id: Option<&str>) -> bool {
        let wanted = trigger.trim().to_lowercase();
        self.snippets.iter().any(|s| {
            s.language == language
                && s.trigger.to_lowercase() == wanted
                && Some(s.id.as_str()) != exclude_id
        })
    }

    /// Every snippet, enabled or not, in insertion order
    pub fn list_all(&self) -> Vec<&Snippet> {
        self.snippets.iter().collect()
    }

    /// Enabled user snippets for one language, in insertion order
    pub fn list_by_language(&self, language: &str) -> Vec<&Snippet> {
        self.snippets
            .iter()
            .filter(|s| s.language == language && s.is_user_defined && s.is_enabled)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Add a new snippet
    /// Generates a unique ID using UUID v4
    #[must_use = "this returns a Result that should be handled"]
    pub fn add(
        &mut self,
        trigger: &str,
        template: &str,
        language: &str,
    ) -> Result<Snippet, SnippetError> {
        let trigger = trigger.trim();
        if trigger.is_empty() || template.is_empty() || language.is_empty() {
            return Err(SnippetError::Validation(
                "trigger, template and language are required".to_string(),
            ));
        }
        if self.is_trigger_taken(trigger, language, None) {
            return Err(SnippetError::Collision {
                trigger: trigger.to_string(),
                language: language.to_string(),
            });
        }

        let snippet = Snippet {
            id: Uuid::new_v4().to_string(),
            trigger: trigger.to_string(),
            template: template.to_string(),
            language: language.to_string(),
            is_user_defined: true,
            is_enabled: true,
            created_at: crate::events::current_timestamp(),
        };

        self.snippets.push(snippet.clone());
        self.save()?;
        crate::info!("Snippet '{}' for {} added", snippet.trigger, snippet.language);
        Ok(snippet)
    }

    /// Merge `patch` into an existing snippet
    #[must_use = "this returns a Result that should be handled"]
    pub fn update(&mut self, id: &str, patch: SnippetPatch) -> Result<Snippet, SnippetError> {
        let index = self
            .position(id)
            .ok_or_else(|| SnippetError::NotFound(id.to_string()))?;

        let trigger = patch.trigger.as_deref().map(str::trim);
        let empty_field = trigger.is_some_and(str::is_empty)
            || patch.template.as_deref().is_some_and(str::is_empty)
            || patch.language.as_deref().is_some_and(str::is_empty);
        if empty_field {
            return Err(SnippetError::Validation(
                "trigger, template and language cannot be empty".to_string(),
            ));
        }

        let current = &self.snippets[index];
        let language = patch.language.as_deref().unwrap_or(current.language.as_str());
        let trigger = trigger.unwrap_or(current.trigger.as_str());
        if self.is_trigger_taken(trigger, language, Some(id)) {
            return Err(SnippetError::Collision {
                trigger: trigger.to_string(),
                language: language.to_string(),
            });
        }
        let (trigger, language) = (trigger.to_string(), language.to_string());

        let snippet = &mut self.snippets[index];
        snippet.trigger = trigger;
        snippet.language = language;
        if let Some(template) = patch.template {
            snippet.template = template;
        }
        if let Some(enabled) = patch.is_enabled {
            snippet.is_enabled = enabled;
        }
        let updated = snippet.clone();

        self.save()?;
        crate::info!("Snippet '{}' updated", updated.trigger);
        Ok(updated)
    }

    /// Delete a snippet by ID
    #[must_use = "this returns a Result that should be handled"]
    pub fn delete(&mut self, id: &str) -> Result<Snippet, SnippetError> {
        let index = self
            .position(id)
            .ok_or_else(|| SnippetError::NotFound(id.to_string()))?;
        let removed = self.snippets.remove(index);
        self.save()?;
        crate::info!("Snippet '{}' deleted", removed.trigger);
        Ok(removed)
    }

    /// Flip the enabled flag of a snippet
    #[must_use = "this returns a Result that should be handled"]
    pub fn toggle_enabled(&mut self, id: &str) -> Result<Snippet, SnippetError> {
        let index = self
            .position(id)
            .ok_or_else(|| SnippetError::NotFound(id.to_string()))?;
        let snippet = &mut self.snippets[index];
        snippet.is_enabled = !snippet.is_enabled;
        let toggled = snippet.clone();

        self.save()?;
        crate::info!(
            "Snippet '{}' {}",
            toggled.trigger,
            if toggled.is_enabled { "enabled" } else { "disabled" }
        );
        Ok(toggled)
    }

    /// Serialize user snippets without identity fields
    ///
    /// Returns None when there is nothing to export.
    pub fn export(&self) -> Result<Option<String>, SnippetError> {
        let exported: Vec<SnippetExport> = self
            .snippets
            .iter()
            .filter(|s| s.is_user_defined)
            .map(SnippetExport::from)
            .collect();
        if exported.is_empty() {
            crate::debug!("No user snippets to export");
            return Ok(None);
        }

        let json = serde_json::to_string_pretty(&exported)
            .map_err(|e| SnippetError::Persistence(e.to_string()))?;
        crate::info!("Exported {} snippets", exported.len());
        Ok(Some(json))
    }

    /// Import snippets from an exported JSON array
    ///
    /// A malformed artifact aborts the whole import. Invalid or colliding
    /// elements are skipped individually.
    pub fn import(&mut self, raw: &str) -> Result<ImportSummary, SnippetError> {
        let parsed: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| SnippetError::ImportParse(e.to_string()))?;
        let serde_json::Value::Array(items) = parsed else {
            return Err(SnippetError::ImportParse("Invalid snippet array.".to_string()));
        };

        let mut summary = ImportSummary::default();
        for item in &items {
            let Some(candidate) = import_candidate(item) else {
                crate::warn!("Skipped invalid snippet object");
                summary.skipped += 1;
                summary
                    .skip_reasons
                    .push(SnippetError::Validation("invalid snippet object".to_string()));
                continue;
            };

            match self.add(&candidate.trigger, &candidate.template, &candidate.language) {
                // A later successful save also writes earlier unsaved elements
                Ok(_) => {
                    summary.imported += 1;
                    summary.save_error = None;
                }
                // Kept in memory even though the write failed
                Err(e @ SnippetError::Persistence(_)) => {
                    summary.imported += 1;
                    summary.save_error = Some(e);
                }
                Err(e) => {
                    crate::warn!("Skipped snippet: {}", e);
                    summary.skipped += 1;
                    summary.skip_reasons.push(e);
                }
            }
        }

        crate::info!(
            "{} snippets imported, {} skipped",
            summary.imported,
            summary.skipped
        );
        Ok(summary)
    }
}

/// Extract trigger/template/language from one import element
fn import_candidate(item: &serde_json::Value) -> Option<SnippetExport> {
    let field = |name: &str| {
        item.get(name)
            .and_then(serde_json::Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    Some(SnippetExport {
        trigger: field("trigger")?,
        template: field("template")?,
        language: field("language")?,
    })
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
