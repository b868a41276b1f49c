use anyhow::{Context, Result};
use finsift_core::{CategoryRuleset, Record};
use finsift_storage::{JsonFileStore, RulesetStore};
use std::path::{Path, PathBuf};

/// Explicit session state owned by the presentation layer: the persisted
/// ruleset and the snapshot of the last user-finalized debit records. The
/// snapshot is what lets corrections survive a re-upload.
pub struct Session {
    store: JsonFileStore,
    snapshot_path: PathBuf,
}

impl Session {
    pub fn new(data_dir: &Path) -> Self {
        Session {
            store: JsonFileStore::new(data_dir.join("categories.json")),
            snapshot_path: data_dir.join("snapshot.json"),
        }
    }

    pub fn ruleset(&self) -> Result<CategoryRuleset> {
        self.store
            .load()
            .with_context(|| format!("loading ruleset from {}", self.store.path().display()))
    }

    pub fn save_ruleset(&self, ruleset: &CategoryRuleset) -> Result<()> {
        self.store
            .save(ruleset)
            .with_context(|| format!("saving ruleset to {}", self.store.path().display()))
    }

    pub fn snapshot(&self) -> Result<Option<Vec<Record>>> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.snapshot_path)?;
        let records = serde_json::from_str(&contents)
            .with_context(|| format!("reading snapshot {}", self.snapshot_path.display()))?;
        Ok(Some(records))
    }

    pub fn set_snapshot(&self, records: &[Record]) -> Result<()> {
        let contents = serde_json::to_string(records)?;
        std::fs::write(&self.snapshot_path, contents)?;
        tracing::debug!(path = %self.snapshot_path.display(), "snapshot replaced");
        Ok(())
    }

    pub fn clear_snapshot(&self) -> Result<()> {
        if self.snapshot_path.exists() {
            std::fs::remove_file(&self.snapshot_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finsift_core::{Amount, Direction, UNCATEGORIZED};
    use rust_decimal::Decimal;

    fn record(details: &str) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            details: details.to_string(),
            amount: Amount::from_decimal(Decimal::from(5)),
            direction: Direction::Debit,
            category: UNCATEGORIZED.to_string(),
        }
    }

    #[test]
    fn snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path());
        assert!(session.snapshot().unwrap().is_none());

        session.set_snapshot(&[record("CAFE")]).unwrap();
        let restored = session.snapshot().unwrap().unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].details, "CAFE");

        session.clear_snapshot().unwrap();
        assert!(session.snapshot().unwrap().is_none());
    }

    #[test]
    fn clear_snapshot_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path());
        session.clear_snapshot().unwrap();
        session.clear_snapshot().unwrap();
    }
}
