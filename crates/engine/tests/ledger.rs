use sea_orm::{Database, DatabaseConnection, EntityTrait};

use engine::{Category, Ledger, LedgerError, LineItemUpdate, NewLineItem, Service, ServiceUpdate};
use migration::MigratorTrait;
use uuid::Uuid;

fn scratch_dir() -> std::path::PathBuf {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_days");
    std::fs::create_dir_all(&root).unwrap();
    root
}

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let dir = scratch_dir();
    let tag = Uuid::new_v4();
    let ledger = Ledger::builder()
        .database(db.clone())
        .snapshot_path(dir.join(format!("day_{tag}.json")))
        .reports_dir(dir.join(format!("reports_{tag}")))
        .build()
        .unwrap();
    (ledger, db)
}

fn session(pc: &str, amount: i64) -> NewLineItem {
    NewLineItem::Session {
        pc: pc.to_string(),
        amount,
        notes: None,
    }
}

fn service_log(service: &str, amount: i64) -> NewLineItem {
    NewLineItem::Service {
        service: service.to_string(),
        amount,
    }
}

fn expense(name: &str, amount: i64) -> NewLineItem {
    NewLineItem::Expense {
        name: name.to_string(),
        amount,
    }
}

#[tokio::test]
async fn create_updates_both_copies_and_totals() {
    let (ledger, db) = ledger_with_db().await;

    let created = ledger
        .create_line_item(session("PC 1", 50), "alice")
        .await
        .unwrap();
    assert!(created.mirrored);
    ledger
        .create_line_item(service_log("Printing", 30), "alice")
        .await
        .unwrap();
    ledger
        .create_line_item(expense("Ink", 20), "alice")
        .await
        .unwrap();

    let totals = ledger.totals().await;
    assert_eq!(totals.pcs, 50);
    assert_eq!(totals.services, 30);
    assert_eq!(totals.expenses, 20);
    assert_eq!(totals.all, 60);

    let row = engine::sessions::Entity::find_by_id(&created.id)
        .one(&db)
        .await
        .unwrap()
        .expect("mirror row missing");
    assert_eq!(row.pc, "PC 1");
    assert_eq!(row.amount, 50);
    assert_eq!(row.staff, "alice");
}

#[tokio::test]
async fn delete_removes_from_both_copies_and_is_idempotent() {
    let (ledger, db) = ledger_with_db().await;

    let created = ledger
        .create_line_item(expense("Coffee", 15), "bob")
        .await
        .unwrap();

    assert!(ledger
        .delete_line_item(Category::ExpenseLog, &created.id)
        .await
        .unwrap());
    assert_eq!(ledger.totals().await.expenses, 0);
    assert!(engine::expense_logs::Entity::find_by_id(&created.id)
        .one(&db)
        .await
        .unwrap()
        .is_none());

    // Second delete of the same id is a no-op.
    assert!(!ledger
        .delete_line_item(Category::ExpenseLog, &created.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn edit_changes_only_named_fields() {
    let (ledger, db) = ledger_with_db().await;

    let created = ledger
        .create_line_item(
            NewLineItem::Session {
                pc: "PC 3".to_string(),
                amount: 40,
                notes: Some("controller".to_string()),
            },
            "alice",
        )
        .await
        .unwrap();

    let touched = ledger
        .edit_line_item(
            Category::Session,
            &created.id,
            &LineItemUpdate {
                amount: Some(55),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(touched);

    let totals = ledger.totals().await;
    assert_eq!(totals.pcs, 55);

    let row = engine::sessions::Entity::find_by_id(&created.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.amount, 55);
    assert_eq!(row.pc, "PC 3");
    assert_eq!(row.notes.as_deref(), Some("controller"));
}

#[tokio::test]
async fn edit_of_unknown_id_reports_not_found() {
    let (ledger, db) = ledger_with_db().await;

    let touched = ledger
        .edit_line_item(
            Category::Session,
            "no-such-id",
            &LineItemUpdate {
                amount: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!touched);

    // A miss must not materialize a row.
    assert!(engine::sessions::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn edit_after_consolidation_touches_durable_copy_only() {
    let (ledger, db) = ledger_with_db().await;

    let created = ledger
        .create_line_item(service_log("Scanning", 25), "alice")
        .await
        .unwrap();
    ledger.consolidate_day().await.unwrap();

    let touched = ledger
        .edit_line_item(
            Category::ServiceLog,
            &created.id,
            &LineItemUpdate {
                amount: Some(35),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(touched);

    // The open day stays empty.
    assert_eq!(ledger.totals().await.services, 0);
    let row = engine::service_logs::Entity::find_by_id(&created.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.amount, 35);
}

#[tokio::test]
async fn edit_recreates_missing_mirror_row() {
    let (ledger, db) = ledger_with_db().await;

    let created = ledger
        .create_line_item(session("PC 7", 60), "bob")
        .await
        .unwrap();
    // Simulate a mirror write that was lost.
    engine::sessions::Entity::delete_by_id(&created.id)
        .exec(&db)
        .await
        .unwrap();

    let touched = ledger
        .edit_line_item(
            Category::Session,
            &created.id,
            &LineItemUpdate {
                label: Some("PC 8".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(touched);

    let row = engine::sessions::Entity::find_by_id(&created.id)
        .one(&db)
        .await
        .unwrap()
        .expect("mirror row not recreated");
    assert_eq!(row.pc, "PC 8");
    assert_eq!(row.amount, 60);
}

#[tokio::test]
async fn consolidate_archives_the_day_and_resets() {
    let (ledger, _db) = ledger_with_db().await;

    ledger
        .create_line_item(session("PC 1", 50), "alice")
        .await
        .unwrap();
    ledger
        .create_line_item(service_log("Printing", 30), "alice")
        .await
        .unwrap();
    ledger
        .create_line_item(expense("Ink", 20), "bob")
        .await
        .unwrap();

    let archived = ledger.consolidate_day().await.unwrap();
    assert_eq!(archived.snapshot.totals.all, 60);
    assert_eq!(archived.snapshot.pcs.len(), 1);

    let report = archived.report.expect("report not written");
    let contents = std::fs::read_to_string(&report).unwrap();
    assert!(contents.contains("Total Income"));
    assert!(contents.contains("PC 1"));

    // The open day starts over.
    let totals = ledger.totals().await;
    assert_eq!(totals.all, 0);
    assert!(ledger.current_day().await.pcs.is_empty());

    let history = ledger.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].date, archived.date);
    assert_eq!(history[0].snapshot.totals.all, 60);
}

#[tokio::test]
async fn consolidation_heals_missing_mirror_rows() {
    let (ledger, db) = ledger_with_db().await;

    let created = ledger
        .create_line_item(expense("Repairs", 100), "alice")
        .await
        .unwrap();
    engine::expense_logs::Entity::delete_by_id(&created.id)
        .exec(&db)
        .await
        .unwrap();

    ledger.consolidate_day().await.unwrap();

    let row = engine::expense_logs::Entity::find_by_id(&created.id)
        .one(&db)
        .await
        .unwrap()
        .expect("consolidation did not recreate the mirror");
    assert_eq!(row.name, "Repairs");
}

#[tokio::test]
async fn list_merges_open_day_with_archive_and_filters_by_staff() {
    let (ledger, _db) = ledger_with_db().await;

    let archived_id = ledger
        .create_line_item(session("PC 1", 10), "alice")
        .await
        .unwrap()
        .id;
    ledger.consolidate_day().await.unwrap();

    let open_id = ledger
        .create_line_item(session("PC 2", 20), "bob")
        .await
        .unwrap()
        .id;

    let all = ledger
        .list_line_items(Category::Session, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    // Open-day items come first.
    assert_eq!(all[0].id, open_id);
    assert_eq!(all[1].id, archived_id);
    assert!(all[1].date.is_some());

    let only_bob = ledger
        .list_line_items(Category::Session, Some("bob"))
        .await
        .unwrap();
    assert_eq!(only_bob.len(), 1);
    assert_eq!(only_bob[0].id, open_id);
}

#[tokio::test]
async fn search_matches_label_staff_and_amount() {
    let (ledger, _db) = ledger_with_db().await;

    ledger
        .create_line_item(session("PC 4", 50), "alice")
        .await
        .unwrap();
    ledger
        .create_line_item(service_log("Printing", 30), "bob")
        .await
        .unwrap();
    ledger
        .create_line_item(expense("Printer ink", 20), "alice")
        .await
        .unwrap();

    let by_label = ledger.search("print", None).await.unwrap();
    assert!(by_label.pcs.is_empty());
    assert_eq!(by_label.services.len(), 1);
    assert_eq!(by_label.expenses.len(), 1);

    let by_staff = ledger.search("ALICE", None).await.unwrap();
    assert_eq!(by_staff.pcs.len(), 1);
    assert!(by_staff.services.is_empty());

    let by_amount = ledger.search("50", None).await.unwrap();
    assert_eq!(by_amount.pcs.len(), 1);

    let scoped = ledger.search("print", Some("bob")).await.unwrap();
    assert_eq!(scoped.services.len(), 1);
    assert!(scoped.expenses.is_empty());
}

#[tokio::test]
async fn rejects_invalid_line_items() {
    let (ledger, _db) = ledger_with_db().await;

    let err = ledger
        .create_line_item(session("", 10), "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = ledger
        .create_line_item(session("PC 1", 0), "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = ledger
        .create_line_item(expense("Ink", -5), "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = ledger
        .create_line_item(session("PC 1", 10), "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    assert_eq!(ledger.totals().await.all, 0);
}

#[tokio::test]
async fn rejects_invalid_updates() {
    let (ledger, _db) = ledger_with_db().await;

    let created = ledger
        .create_line_item(session("PC 1", 10), "alice")
        .await
        .unwrap();

    let err = ledger
        .edit_line_item(
            Category::Session,
            &created.id,
            &LineItemUpdate {
                amount: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(ledger.totals().await.pcs, 10);
}

#[tokio::test]
async fn snapshot_survives_restart() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let dir = scratch_dir();
    let path = dir.join(format!("day_{}.json", Uuid::new_v4()));

    let ledger = Ledger::builder()
        .database(db.clone())
        .snapshot_path(&path)
        .build()
        .unwrap();
    ledger
        .create_line_item(session("PC 1", 45), "alice")
        .await
        .unwrap();
    ledger.set_log_channel(Some(42)).await.unwrap();
    drop(ledger);

    let reopened = Ledger::builder()
        .database(db)
        .snapshot_path(&path)
        .build()
        .unwrap();
    assert_eq!(reopened.totals().await.pcs, 45);
    assert_eq!(reopened.log_channel().await, Some(42));
}

fn catalog_entry(name: &str, cost: i64, custom_cost: bool) -> Service {
    Service {
        name: name.to_string(),
        cost,
        emoji: "🧾".to_string(),
        available: true,
        custom_cost,
    }
}

#[tokio::test]
async fn catalog_names_are_unique_case_insensitively() {
    let (ledger, _db) = ledger_with_db().await;

    ledger
        .add_service(catalog_entry("Printing", 10, false))
        .await
        .unwrap();

    let err = ledger
        .add_service(catalog_entry("printing", 12, false))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ExistingKey(_)));

    let names: Vec<String> = ledger
        .services(false)
        .await
        .unwrap()
        .into_iter()
        .map(|service| service.name)
        .collect();
    assert_eq!(names, vec!["Printing".to_string()]);
}

#[tokio::test]
async fn catalog_update_rename_and_toggle() {
    let (ledger, _db) = ledger_with_db().await;

    ledger
        .add_service(catalog_entry("Scanning", 5, false))
        .await
        .unwrap();

    let updated = ledger
        .update_service(
            "Scanning",
            ServiceUpdate {
                name: Some("Scan".to_string()),
                cost: Some(8),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Scan");
    assert_eq!(updated.cost, 8);

    let err = ledger.service("Scanning").await.unwrap_err();
    assert!(matches!(err, LedgerError::KeyNotFound(_)));

    assert!(!ledger.toggle_service("Scan").await.unwrap());
    assert!(ledger.services(true).await.unwrap().is_empty());
    assert!(ledger.toggle_service("Scan").await.unwrap());

    assert!(ledger.delete_service("Scan").await.unwrap());
    assert!(!ledger.delete_service("Scan").await.unwrap());
}

#[tokio::test]
async fn custom_cost_only_honored_when_allowed() {
    let (ledger, _db) = ledger_with_db().await;

    ledger
        .add_service(catalog_entry("Printing", 10, false))
        .await
        .unwrap();
    ledger
        .add_service(catalog_entry("Repair", 0, true))
        .await
        .unwrap();

    assert_eq!(
        ledger.resolve_service_cost("Printing", Some(99)).await.unwrap(),
        10
    );
    assert_eq!(
        ledger.resolve_service_cost("Repair", Some(120)).await.unwrap(),
        120
    );
    assert_eq!(ledger.resolve_service_cost("Repair", None).await.unwrap(), 0);

    let err = ledger
        .resolve_service_cost("Lamination", None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::KeyNotFound(_)));
}
