//! The historical archive (`daily_logs` table).
//!
//! Consolidation appends one immutable row per closed day: the close-out
//! date plus the whole snapshot document as JSON. Rows are never mutated.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::snapshot::Snapshot;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "daily_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub date: String,
    pub document: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A consolidated day as returned by [`Ledger::consolidate_day`] and
/// [`Ledger::history`].
///
/// `report` is the path of the generated report file; `None` when reading
/// back from the archive or when report generation failed.
///
/// [`Ledger::consolidate_day`]: crate::Ledger::consolidate_day
/// [`Ledger::history`]: crate::Ledger::history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchivedDay {
    pub date: String,
    pub snapshot: Snapshot,
    pub report: Option<PathBuf>,
}
