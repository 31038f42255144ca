//! Daily report writer.
//!
//! Consolidation renders the archived day into `daily_report_{date}.csv`:
//! a summary block followed by one block per category. The file stands in
//! for whatever the business prints at close-out.

use std::path::{Path, PathBuf};

use crate::{LedgerError, ResultLedger, line_items::LineItem, snapshot::Snapshot};

pub fn write_daily_report(dir: &Path, date: &str, snapshot: &Snapshot) -> ResultLedger<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|err| LedgerError::Snapshot(format!("create {}: {err}", dir.display())))?;

    let path = dir.join(format!("daily_report_{date}.csv"));
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&path)
        .map_err(|err| LedgerError::Snapshot(format!("open {}: {err}", path.display())))?;

    let io_err =
        |err: csv::Error| LedgerError::Snapshot(format!("write {}: {err}", path.display()));

    writer
        .write_record(["Daily Report", date])
        .map_err(io_err)?;
    writer.write_record(["Category", "Amount"]).map_err(io_err)?;
    writer
        .write_record(["PC Sessions", &snapshot.totals.pcs.to_string()])
        .map_err(io_err)?;
    writer
        .write_record(["Services", &snapshot.totals.services.to_string()])
        .map_err(io_err)?;
    writer
        .write_record(["Expenses", &snapshot.totals.expenses.to_string()])
        .map_err(io_err)?;
    writer
        .write_record(["Total Income", &snapshot.totals.all.to_string()])
        .map_err(io_err)?;

    write_section(&mut writer, "PC Sessions", "PC", &snapshot.pcs).map_err(io_err)?;
    write_section(&mut writer, "Services", "Service", &snapshot.services).map_err(io_err)?;
    write_section(&mut writer, "Expenses", "Expense", &snapshot.expenses).map_err(io_err)?;

    writer.flush().map_err(|err| {
        LedgerError::Snapshot(format!("flush {}: {err}", path.display()))
    })?;
    Ok(path)
}

fn write_section<W: std::io::Write, T: LineItem>(
    writer: &mut csv::Writer<W>,
    title: &str,
    label_header: &str,
    items: &[T],
) -> Result<(), csv::Error> {
    if items.is_empty() {
        return Ok(());
    }

    writer.write_record([title])?;
    writer.write_record([label_header, "Amount", "Staff", "Time"])?;
    for item in items {
        writer.write_record([
            item.label(),
            &item.amount().to_string(),
            item.staff(),
            item.time(),
        ])?;
    }
    Ok(())
}
