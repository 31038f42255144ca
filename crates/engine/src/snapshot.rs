//! The live "current day" snapshot and its flat-file store.
//!
//! The snapshot is one JSON blob holding the open day's line items, the
//! running totals and an optional reporting channel. There is exactly one
//! live instance; the ledger keeps it behind a mutex and rewrites the whole
//! file after every mutation.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    LedgerError, ResultLedger,
    line_items::{ExpenseItem, ServiceItem, SessionItem},
    totals::Totals,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub pcs: Vec<SessionItem>,
    #[serde(default)]
    pub services: Vec<ServiceItem>,
    #[serde(default)]
    pub expenses: Vec<ExpenseItem>,
    #[serde(default)]
    pub totals: Totals,
    /// Chat the bot reports daily activity to, when bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_channel_id: Option<i64>,
}

impl Snapshot {
    /// Recompute the stored totals from the sequences.
    ///
    /// Must run after every mutation of `pcs`/`services`/`expenses`; the
    /// stored value is only a display cache.
    pub fn refresh_totals(&mut self) {
        self.totals = Totals::of(&self.pcs, &self.services, &self.expenses);
    }

    pub fn line_count(&self) -> usize {
        self.pcs.len() + self.services.len() + self.expenses.len()
    }
}

/// Reads and rewrites the snapshot blob on disk.
///
/// Plain read-modify-write, no locking at the file level: the ledger's
/// snapshot mutex is the only writer coordination.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or start an empty day if the file does not exist.
    pub fn load_or_default(&self) -> ResultLedger<Snapshot> {
        if !self.path.exists() {
            return Ok(Snapshot::default());
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|err| LedgerError::Snapshot(format!("read {}: {err}", self.path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|err| LedgerError::Snapshot(format!("parse {}: {err}", self.path.display())))
    }

    pub fn persist(&self, snapshot: &Snapshot) -> ResultLedger<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| {
                LedgerError::Snapshot(format!("create {}: {err}", parent.display()))
            })?;
        }

        let raw = serde_json::to_string_pretty(snapshot)
            .map_err(|err| LedgerError::Snapshot(format!("serialize snapshot: {err}")))?;
        fs::write(&self.path, raw)
            .map_err(|err| LedgerError::Snapshot(format!("write {}: {err}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty_day() {
        let store = SnapshotStore::new("/nonexistent/never/current_day.json");
        let snapshot = store.load_or_default().unwrap();
        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(snapshot.line_count(), 0);
    }

    #[test]
    fn legacy_blob_without_expenses_still_parses() {
        // Early snapshots predate expense tracking and the period field.
        let raw = r#"{
            "pcs": [{"session_id": "a", "pc": "PC 3", "amount": 40, "staff": "yousef", "time": "01 Jan 2026 10:00 AM"}],
            "services": [],
            "totals": {"pcs": 40, "services": 0, "all": 40},
            "log_channel_id": 42
        }"#;

        let mut snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert!(snapshot.expenses.is_empty());
        assert_eq!(snapshot.log_channel_id, Some(42));

        snapshot.refresh_totals();
        assert_eq!(snapshot.totals.expenses, 0);
        assert_eq!(snapshot.totals.all, 40);
    }
}
