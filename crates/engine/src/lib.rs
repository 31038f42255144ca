//! Ledger engine for the daybook point of sale.
//!
//! The engine owns the rules for creating, editing, deleting and totaling
//! line items across two stores with different lifecycles:
//!
//! - the live snapshot, one JSON blob holding the open day (source of truth
//!   for "today"),
//! - the durable per-category tables, one row per line item (source of truth
//!   for history).
//!
//! Every mutation is mirrored into both stores without a shared transaction,
//! so a partial failure leaves them inconsistent until the next end-of-day
//! consolidation re-creates missing mirror rows. The snapshot sits behind a
//! single mutex; there is one writer at a time and no finer-grained locking.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use chrono_tz::Africa::Cairo;
use sea_orm::{
    ActiveValue, DatabaseConnection, QueryOrder, TransactionTrait, prelude::*,
};
use tokio::sync::Mutex;
use uuid::Uuid;

pub use daily_logs::ArchivedDay;
pub use error::LedgerError;
pub use line_items::{
    Category, ExpenseItem, LineItem, LineItemUpdate, LineItemView, NewLineItem, ServiceItem,
    SessionItem,
};
pub use services::{Service, ServiceUpdate};
pub use snapshot::{Snapshot, SnapshotStore};
pub use totals::{Totals, cost_to_time};

pub mod daily_logs;
mod error;
pub mod expense_logs;
mod line_items;
mod report;
pub mod service_logs;
pub mod services;
pub mod sessions;
mod snapshot;
mod totals;
pub mod users;

type ResultLedger<T> = Result<T, LedgerError>;

const DEFAULT_SNAPSHOT_PATH: &str = "current_day.json";
const DEFAULT_REPORTS_DIR: &str = "reports";

/// Result of [`Ledger::create_line_item`].
///
/// `mirrored` is `false` when the durable mirror write failed: the item only
/// exists in the snapshot until the next consolidation heals the drift.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Created {
    pub id: String,
    pub totals: Totals,
    pub mirrored: bool,
}

/// Search hits grouped by category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub pcs: Vec<LineItemView>,
    pub services: Vec<LineItemView>,
    pub expenses: Vec<LineItemView>,
}

#[derive(Debug)]
pub struct Ledger {
    snapshot: Mutex<Snapshot>,
    store: SnapshotStore,
    database: DatabaseConnection,
    reports_dir: PathBuf,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Create a line item and mirror it into the matching durable table.
    ///
    /// The snapshot write is authoritative for the open day. A failed mirror
    /// write is logged and surfaced through [`Created::mirrored`] instead of
    /// aborting; consolidation re-creates missing mirrors.
    pub async fn create_line_item(&self, item: NewLineItem, staff: &str) -> ResultLedger<Created> {
        item.validate()?;
        if staff.trim().is_empty() {
            return Err(LedgerError::Validation("staff is required".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let time = local_time_string(now);
        let date = calendar_date(now);

        let mut snapshot = self.snapshot.lock().await;
        let mirrored = match item {
            NewLineItem::Session { pc, amount, notes } => {
                let entry = SessionItem {
                    session_id: id.clone(),
                    pc,
                    amount,
                    staff: staff.to_string(),
                    time,
                    notes,
                    period: None,
                };
                let mirrored = match sessions::active_from_item(&entry, &date, now)
                    .insert(&self.database)
                    .await
                {
                    Ok(_) => true,
                    Err(err) => {
                        mirror_failed(Category::Session, &id, &err);
                        false
                    }
                };
                snapshot.pcs.push(entry);
                mirrored
            }
            NewLineItem::Service { service, amount } => {
                let entry = ServiceItem {
                    log_id: id.clone(),
                    service,
                    amount,
                    staff: staff.to_string(),
                    time,
                    period: None,
                };
                let mirrored = match service_logs::active_from_item(&entry, &date, now)
                    .insert(&self.database)
                    .await
                {
                    Ok(_) => true,
                    Err(err) => {
                        mirror_failed(Category::ServiceLog, &id, &err);
                        false
                    }
                };
                snapshot.services.push(entry);
                mirrored
            }
            NewLineItem::Expense { name, amount } => {
                let entry = ExpenseItem {
                    log_id: id.clone(),
                    name,
                    amount,
                    staff: staff.to_string(),
                    time,
                    period: None,
                };
                let mirrored = match expense_logs::active_from_item(&entry, &date, now)
                    .insert(&self.database)
                    .await
                {
                    Ok(_) => true,
                    Err(err) => {
                        mirror_failed(Category::ExpenseLog, &id, &err);
                        false
                    }
                };
                snapshot.expenses.push(entry);
                mirrored
            }
        };

        snapshot.refresh_totals();
        self.store.persist(&snapshot)?;

        Ok(Created {
            id,
            totals: snapshot.totals,
            mirrored,
        })
    }

    /// Apply field overrides to a line item in both stores.
    ///
    /// Returns `false` when the identifier exists in neither copy. When only
    /// the durable row exists (an already archived day) the snapshot is left
    /// untouched; when only the snapshot copy exists the missing mirror row
    /// is recreated from it.
    pub async fn edit_line_item(
        &self,
        category: Category,
        id: &str,
        update: &LineItemUpdate,
    ) -> ResultLedger<bool> {
        update.validate()?;

        let now = Utc::now();
        let date = calendar_date(now);
        let mut snapshot = self.snapshot.lock().await;

        let (in_snapshot, in_durable) = match category {
            Category::Session => {
                let copy = snapshot
                    .pcs
                    .iter_mut()
                    .find(|item| item.session_id == id)
                    .map(|item| {
                        item.apply(update);
                        item.clone()
                    });
                let touched = self
                    .edit_session_row(id, update, copy.as_ref(), &date, now)
                    .await?;
                (copy.is_some(), touched)
            }
            Category::ServiceLog => {
                let copy = snapshot
                    .services
                    .iter_mut()
                    .find(|item| item.log_id == id)
                    .map(|item| {
                        item.apply(update);
                        item.clone()
                    });
                let touched = self
                    .edit_service_row(id, update, copy.as_ref(), &date, now)
                    .await?;
                (copy.is_some(), touched)
            }
            Category::ExpenseLog => {
                let copy = snapshot
                    .expenses
                    .iter_mut()
                    .find(|item| item.log_id == id)
                    .map(|item| {
                        item.apply(update);
                        item.clone()
                    });
                let touched = self
                    .edit_expense_row(id, update, copy.as_ref(), &date, now)
                    .await?;
                (copy.is_some(), touched)
            }
        };

        if in_snapshot {
            snapshot.refresh_totals();
            self.store.persist(&snapshot)?;
        }

        Ok(in_snapshot || in_durable)
    }

    /// Remove a line item from both stores by identifier.
    ///
    /// Idempotent: deleting an absent identifier returns `false` and leaves
    /// totals unchanged.
    pub async fn delete_line_item(&self, category: Category, id: &str) -> ResultLedger<bool> {
        let mut snapshot = self.snapshot.lock().await;

        let in_snapshot = match category {
            Category::Session => {
                let before = snapshot.pcs.len();
                snapshot.pcs.retain(|item| item.session_id != id);
                snapshot.pcs.len() != before
            }
            Category::ServiceLog => {
                let before = snapshot.services.len();
                snapshot.services.retain(|item| item.log_id != id);
                snapshot.services.len() != before
            }
            Category::ExpenseLog => {
                let before = snapshot.expenses.len();
                snapshot.expenses.retain(|item| item.log_id != id);
                snapshot.expenses.len() != before
            }
        };

        if in_snapshot {
            snapshot.refresh_totals();
            self.store.persist(&snapshot)?;
        }

        let rows_affected = match category {
            Category::Session => {
                sessions::Entity::delete_by_id(id)
                    .exec(&self.database)
                    .await?
                    .rows_affected
            }
            Category::ServiceLog => {
                service_logs::Entity::delete_by_id(id)
                    .exec(&self.database)
                    .await?
                    .rows_affected
            }
            Category::ExpenseLog => {
                expense_logs::Entity::delete_by_id(id)
                    .exec(&self.database)
                    .await?
                    .rows_affected
            }
        };

        Ok(in_snapshot || rows_affected > 0)
    }

    /// List a category: open-day items first (insertion order), then durable
    /// rows newest first, de-duplicated by identifier with the snapshot copy
    /// winning.
    pub async fn list_line_items(
        &self,
        category: Category,
        staff_filter: Option<&str>,
    ) -> ResultLedger<Vec<LineItemView>> {
        let mut views = {
            let snapshot = self.snapshot.lock().await;
            match category {
                Category::Session => snapshot
                    .pcs
                    .iter()
                    .map(|item| LineItemView::from_item(item, item.notes.clone()))
                    .collect::<Vec<_>>(),
                Category::ServiceLog => snapshot
                    .services
                    .iter()
                    .map(|item| LineItemView::from_item(item, None))
                    .collect(),
                Category::ExpenseLog => snapshot
                    .expenses
                    .iter()
                    .map(|item| LineItemView::from_item(item, None))
                    .collect(),
            }
        };

        let seen: HashSet<String> = views.iter().map(|view| view.id.clone()).collect();
        let rows: Vec<LineItemView> = match category {
            Category::Session => sessions::Entity::find()
                .order_by_desc(sessions::Column::Timestamp)
                .all(&self.database)
                .await?
                .into_iter()
                .map(sessions::Model::into_view)
                .collect(),
            Category::ServiceLog => service_logs::Entity::find()
                .order_by_desc(service_logs::Column::Timestamp)
                .all(&self.database)
                .await?
                .into_iter()
                .map(service_logs::Model::into_view)
                .collect(),
            Category::ExpenseLog => expense_logs::Entity::find()
                .order_by_desc(expense_logs::Column::Timestamp)
                .all(&self.database)
                .await?
                .into_iter()
                .map(expense_logs::Model::into_view)
                .collect(),
        };
        views.extend(rows.into_iter().filter(|view| !seen.contains(&view.id)));

        if let Some(staff) = staff_filter {
            views.retain(|view| view.staff == staff);
        }

        Ok(views)
    }

    /// Case-insensitive substring search over name field, staff and the
    /// decimal form of the amount, across all three categories.
    pub async fn search(
        &self,
        query: &str,
        staff_filter: Option<&str>,
    ) -> ResultLedger<SearchResults> {
        let needle = query.to_lowercase();

        let mut results = SearchResults {
            pcs: self.list_line_items(Category::Session, staff_filter).await?,
            services: self
                .list_line_items(Category::ServiceLog, staff_filter)
                .await?,
            expenses: self
                .list_line_items(Category::ExpenseLog, staff_filter)
                .await?,
        };
        results.pcs.retain(|view| view.matches(&needle));
        results.services.retain(|view| view.matches(&needle));
        results.expenses.retain(|view| view.matches(&needle));

        Ok(results)
    }

    /// Fold the open day into the historical archive and start a fresh one.
    ///
    /// Steps, in order: re-upsert every mirror row stamped with the close-out
    /// date (heals earlier mirror failures), append the stamped snapshot to
    /// `daily_logs`, write the report file (failure logged, not fatal), reset
    /// the live snapshot. Not atomic; a failure partway leaves whatever state
    /// was reached.
    pub async fn consolidate_day(&self) -> ResultLedger<ArchivedDay> {
        let mut snapshot = self.snapshot.lock().await;
        let now = Utc::now();
        let date = calendar_date(now);

        for item in &snapshot.pcs {
            self.upsert_session_row(item, &date, now).await?;
        }
        for item in &snapshot.services {
            self.upsert_service_row(item, &date, now).await?;
        }
        for item in &snapshot.expenses {
            self.upsert_expense_row(item, &date, now).await?;
        }

        let mut archived = snapshot.clone();
        archived.refresh_totals();

        let document = serde_json::to_string(&archived)
            .map_err(|err| LedgerError::Snapshot(format!("serialize archive: {err}")))?;
        daily_logs::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            date: ActiveValue::Set(date.clone()),
            document: ActiveValue::Set(document),
            created_at: ActiveValue::Set(now),
        }
        .insert(&self.database)
        .await?;

        let report = match report::write_daily_report(&self.reports_dir, &date, &archived) {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!("daily report generation failed: {err}");
                None
            }
        };

        *snapshot = Snapshot::default();
        self.store.persist(&snapshot)?;

        Ok(ArchivedDay {
            date,
            snapshot: archived,
            report,
        })
    }

    /// Totals of the open day, recomputed from the sequences.
    pub async fn totals(&self) -> Totals {
        let snapshot = self.snapshot.lock().await;
        Totals::of(&snapshot.pcs, &snapshot.services, &snapshot.expenses)
    }

    /// A copy of the open day with refreshed totals.
    pub async fn current_day(&self) -> Snapshot {
        let mut copy = self.snapshot.lock().await.clone();
        copy.refresh_totals();
        copy
    }

    /// Archived days, newest first.
    ///
    /// Unreadable rows are skipped with a diagnostic instead of failing the
    /// whole listing.
    pub async fn history(&self) -> ResultLedger<Vec<ArchivedDay>> {
        let rows = daily_logs::Entity::find()
            .order_by_desc(daily_logs::Column::Date)
            .all(&self.database)
            .await?;

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            let mut snapshot: Snapshot = match serde_json::from_str(&row.document) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    tracing::warn!(
                        "skipping unreadable archive entry {} ({}): {err}",
                        row.id,
                        row.date
                    );
                    continue;
                }
            };
            // Documents that predate expense tracking miss totals fields;
            // re-derive the net total from the per-category ones.
            snapshot.totals.all =
                snapshot.totals.pcs + snapshot.totals.services - snapshot.totals.expenses;
            days.push(ArchivedDay {
                date: row.date,
                snapshot,
                report: None,
            });
        }

        Ok(days)
    }

    /// Bind (or clear) the chat the bot reports to.
    pub async fn set_log_channel(&self, channel: Option<i64>) -> ResultLedger<()> {
        let mut snapshot = self.snapshot.lock().await;
        snapshot.log_channel_id = channel;
        self.store.persist(&snapshot)
    }

    pub async fn log_channel(&self) -> Option<i64> {
        self.snapshot.lock().await.log_channel_id
    }

    /// Catalog entries, sorted by name.
    pub async fn services(&self, available_only: bool) -> ResultLedger<Vec<Service>> {
        let mut rows = services::Entity::find()
            .order_by_asc(services::Column::Name)
            .all(&self.database)
            .await?;
        if available_only {
            rows.retain(|model| model.available);
        }
        Ok(rows.into_iter().map(Service::from).collect())
    }

    /// Return a catalog entry by exact name.
    pub async fn service(&self, name: &str) -> ResultLedger<Service> {
        services::Entity::find_by_id(name)
            .one(&self.database)
            .await?
            .map(Service::from)
            .ok_or_else(|| LedgerError::KeyNotFound(name.to_string()))
    }

    /// Add a catalog entry. Names are unique case-insensitively.
    pub async fn add_service(&self, service: Service) -> ResultLedger<()> {
        if service.name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "service name is required".to_string(),
            ));
        }
        if service.cost < 0 {
            return Err(LedgerError::Validation("cost must be >= 0".to_string()));
        }

        let wanted = services::normalized(&service.name);
        let existing = services::Entity::find().all(&self.database).await?;
        if existing
            .iter()
            .any(|model| services::normalized(&model.name) == wanted)
        {
            return Err(LedgerError::ExistingKey(service.name));
        }

        services::ActiveModel::from(&service)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    /// Update a catalog entry, renaming it when `update.name` is set.
    pub async fn update_service(&self, name: &str, update: ServiceUpdate) -> ResultLedger<Service> {
        let model = services::Entity::find_by_id(name)
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound(name.to_string()))?;

        let mut updated = Service::from(model);
        if let Some(new_name) = update.name {
            updated.name = new_name;
        }
        if let Some(cost) = update.cost {
            updated.cost = cost;
        }
        if let Some(emoji) = update.emoji {
            updated.emoji = emoji;
        }
        if let Some(available) = update.available {
            updated.available = available;
        }
        if let Some(custom_cost) = update.custom_cost {
            updated.custom_cost = custom_cost;
        }

        if updated.name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "service name is required".to_string(),
            ));
        }
        if updated.cost < 0 {
            return Err(LedgerError::Validation("cost must be >= 0".to_string()));
        }

        if updated.name != name {
            // The name is the key, so a rename is a delete + insert.
            let wanted = services::normalized(&updated.name);
            let existing = services::Entity::find().all(&self.database).await?;
            if existing
                .iter()
                .any(|model| model.name != name && services::normalized(&model.name) == wanted)
            {
                return Err(LedgerError::ExistingKey(updated.name));
            }

            let db_tx = self.database.begin().await?;
            services::Entity::delete_by_id(name).exec(&db_tx).await?;
            services::ActiveModel::from(&updated).insert(&db_tx).await?;
            db_tx.commit().await?;
        } else {
            services::ActiveModel::from(&updated)
                .update(&self.database)
                .await?;
        }

        Ok(updated)
    }

    /// Flip a catalog entry's availability; returns the new state.
    pub async fn toggle_service(&self, name: &str) -> ResultLedger<bool> {
        let model = services::Entity::find_by_id(name)
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound(name.to_string()))?;

        let next = !model.available;
        let active = services::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            available: ActiveValue::Set(next),
            ..Default::default()
        };
        active.update(&self.database).await?;
        Ok(next)
    }

    /// Remove a catalog entry; `false` when it did not exist.
    pub async fn delete_service(&self, name: &str) -> ResultLedger<bool> {
        let result = services::Entity::delete_by_id(name)
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Price a service log: the caller's custom cost only counts when the
    /// catalog entry allows overrides.
    pub async fn resolve_service_cost(
        &self,
        name: &str,
        custom: Option<i64>,
    ) -> ResultLedger<i64> {
        let service = self.service(name).await?;
        match custom {
            Some(cost) if service.custom_cost => {
                if cost <= 0 {
                    return Err(LedgerError::Validation("amount must be > 0".to_string()));
                }
                Ok(cost)
            }
            _ => Ok(service.cost),
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        self.store.path()
    }

    async fn edit_session_row(
        &self,
        id: &str,
        update: &LineItemUpdate,
        snapshot_copy: Option<&SessionItem>,
        date: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<bool> {
        match sessions::Entity::find_by_id(id).one(&self.database).await? {
            Some(_) => {
                let mut active = sessions::ActiveModel {
                    session_id: ActiveValue::Set(id.to_string()),
                    ..Default::default()
                };
                if let Some(label) = &update.label {
                    active.pc = ActiveValue::Set(label.clone());
                }
                if let Some(amount) = update.amount {
                    active.amount = ActiveValue::Set(amount);
                }
                if let Some(notes) = &update.notes {
                    active.notes = ActiveValue::Set(Some(notes.clone()));
                }
                active.update(&self.database).await?;
                Ok(true)
            }
            None => match snapshot_copy {
                // The open day has the item but its mirror is missing:
                // recreate the row from the already-updated copy.
                Some(item) => {
                    sessions::active_from_item(item, date, now)
                        .insert(&self.database)
                        .await?;
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    async fn edit_service_row(
        &self,
        id: &str,
        update: &LineItemUpdate,
        snapshot_copy: Option<&ServiceItem>,
        date: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<bool> {
        match service_logs::Entity::find_by_id(id)
            .one(&self.database)
            .await?
        {
            Some(_) => {
                let mut active = service_logs::ActiveModel {
                    log_id: ActiveValue::Set(id.to_string()),
                    ..Default::default()
                };
                if let Some(label) = &update.label {
                    active.service = ActiveValue::Set(label.clone());
                }
                if let Some(amount) = update.amount {
                    active.amount = ActiveValue::Set(amount);
                }
                active.update(&self.database).await?;
                Ok(true)
            }
            None => match snapshot_copy {
                Some(item) => {
                    service_logs::active_from_item(item, date, now)
                        .insert(&self.database)
                        .await?;
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    async fn edit_expense_row(
        &self,
        id: &str,
        update: &LineItemUpdate,
        snapshot_copy: Option<&ExpenseItem>,
        date: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<bool> {
        match expense_logs::Entity::find_by_id(id)
            .one(&self.database)
            .await?
        {
            Some(_) => {
                let mut active = expense_logs::ActiveModel {
                    log_id: ActiveValue::Set(id.to_string()),
                    ..Default::default()
                };
                if let Some(label) = &update.label {
                    active.name = ActiveValue::Set(label.clone());
                }
                if let Some(amount) = update.amount {
                    active.amount = ActiveValue::Set(amount);
                }
                active.update(&self.database).await?;
                Ok(true)
            }
            None => match snapshot_copy {
                Some(item) => {
                    expense_logs::active_from_item(item, date, now)
                        .insert(&self.database)
                        .await?;
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    async fn upsert_session_row(
        &self,
        item: &SessionItem,
        date: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        match sessions::Entity::find_by_id(&item.session_id)
            .one(&self.database)
            .await?
        {
            Some(model) => {
                sessions::active_from_item(item, date, model.timestamp)
                    .update(&self.database)
                    .await?;
            }
            None => {
                sessions::active_from_item(item, date, now)
                    .insert(&self.database)
                    .await?;
            }
        }
        Ok(())
    }

    async fn upsert_service_row(
        &self,
        item: &ServiceItem,
        date: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        match service_logs::Entity::find_by_id(&item.log_id)
            .one(&self.database)
            .await?
        {
            Some(model) => {
                service_logs::active_from_item(item, date, model.timestamp)
                    .update(&self.database)
                    .await?;
            }
            None => {
                service_logs::active_from_item(item, date, now)
                    .insert(&self.database)
                    .await?;
            }
        }
        Ok(())
    }

    async fn upsert_expense_row(
        &self,
        item: &ExpenseItem,
        date: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        match expense_logs::Entity::find_by_id(&item.log_id)
            .one(&self.database)
            .await?
        {
            Some(model) => {
                expense_logs::active_from_item(item, date, model.timestamp)
                    .update(&self.database)
                    .await?;
            }
            None => {
                expense_logs::active_from_item(item, date, now)
                    .insert(&self.database)
                    .await?;
            }
        }
        Ok(())
    }
}

fn mirror_failed(category: Category, id: &str, err: &DbErr) {
    tracing::warn!(
        "durable mirror write failed for {} {id}: {err}",
        category.as_str()
    );
}

/// Wall-clock timestamp string shown on receipts and lists.
fn local_time_string(now: DateTime<Utc>) -> String {
    now.with_timezone(&Cairo).format("%d %b %Y %I:%M %p").to_string()
}

/// Calendar day used for mirror rows and archive stamps.
fn calendar_date(now: DateTime<Utc>) -> String {
    now.with_timezone(&Cairo).format("%Y-%m-%d").to_string()
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
    snapshot_path: Option<PathBuf>,
    reports_dir: Option<PathBuf>,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> LedgerBuilder {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn reports_dir(mut self, dir: impl Into<PathBuf>) -> LedgerBuilder {
        self.reports_dir = Some(dir.into());
        self
    }

    /// Construct `Ledger`, loading the snapshot blob (or starting an empty
    /// day when the file does not exist).
    pub fn build(self) -> ResultLedger<Ledger> {
        let store = SnapshotStore::new(
            self.snapshot_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
        );
        let mut snapshot = store.load_or_default()?;
        // Stored totals are only a display cache; never trust them on load.
        snapshot.refresh_totals();

        Ok(Ledger {
            snapshot: Mutex::new(snapshot),
            store,
            database: self.database,
            reports_dir: self
                .reports_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR)),
        })
    }
}
