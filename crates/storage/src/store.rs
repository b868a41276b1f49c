use finsift_core::CategoryRuleset;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed ruleset data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Persistence seam for the category ruleset. Saving is an explicit,
/// caller-invoked batch operation, never a hidden side effect of a single
/// mutation.
pub trait RulesetStore {
    fn load(&self) -> Result<CategoryRuleset, StoreError>;
    fn save(&self, ruleset: &CategoryRuleset) -> Result<(), StoreError>;
}

/// Ruleset persisted as one JSON object (category name → keyword array)
/// at a fixed path. A missing file is a first run and yields the default
/// ruleset; a file that exists but fails to deserialize is surfaced as
/// [`StoreError::Malformed`] rather than silently replaced.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RulesetStore for JsonFileStore {
    fn load(&self) -> Result<CategoryRuleset, StoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no ruleset file, using defaults");
            return Ok(CategoryRuleset::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let mut ruleset: CategoryRuleset = serde_json::from_str(&contents)?;
        ruleset.ensure_uncategorized();
        Ok(ruleset)
    }

    fn save(&self, ruleset: &CategoryRuleset) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(ruleset)?;
        std::fs::write(&self.path, contents)?;
        tracing::debug!(path = %self.path.display(), "ruleset saved");
        Ok(())
    }
}

/// In-memory store for tests: keeps the serialized form so load/save
/// exercise the same JSON round trip as the file backend.
#[derive(Default)]
pub struct MemoryStore {
    contents: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RulesetStore for MemoryStore {
    fn load(&self) -> Result<CategoryRuleset, StoreError> {
        match self.contents.borrow().as_deref() {
            None => Ok(CategoryRuleset::default()),
            Some(contents) => {
                let mut ruleset: CategoryRuleset = serde_json::from_str(contents)?;
                ruleset.ensure_uncategorized();
                Ok(ruleset)
            }
        }
    }

    fn save(&self, ruleset: &CategoryRuleset) -> Result<(), StoreError> {
        *self.contents.borrow_mut() = Some(serde_json::to_string(ruleset)?);
        Ok(())
    }
}
