//! Reply formatting.

use api_types::{
    LineItemView, Totals,
    catalog::ServicesResponse,
    close::CloseDayResponse,
    line_item::Created,
    search::SearchResponse,
    summary::Summary,
};
use engine::cost_to_time;

const MIRROR_WARNING: &str = "\n⚠ Saved for today only; history sync is pending.";

pub(crate) fn session_logged(pc: &str, amount: i64, created: &Created) -> String {
    let mut text = format!(
        "🖥 {pc} — {amount} ({}). Day net: {}",
        cost_to_time(amount),
        created.totals.all
    );
    if !created.mirrored {
        text.push_str(MIRROR_WARNING);
    }
    text
}

pub(crate) fn service_logged(service: &str, created: &Created) -> String {
    let mut text = format!(
        "🧾 {service} logged. Services today: {}",
        created.totals.services
    );
    if !created.mirrored {
        text.push_str(MIRROR_WARNING);
    }
    text
}

pub(crate) fn expense_logged(name: &str, amount: i64, created: &Created) -> String {
    let mut text = format!(
        "💸 {name} — {amount}. Expenses today: {}",
        created.totals.expenses
    );
    if !created.mirrored {
        text.push_str(MIRROR_WARNING);
    }
    text
}

fn render_totals(totals: &Totals) -> String {
    format!(
        "PC sessions: {}\nServices: {}\nExpenses: {}\nNet: {}",
        totals.pcs, totals.services, totals.expenses, totals.all
    )
}

fn render_item(item: &LineItemView) -> String {
    let mut line = format!(
        "• {} — {} ({}, {})",
        item.label, item.amount, item.staff, item.time
    );
    if let Some(notes) = &item.notes
        && !notes.is_empty()
    {
        line.push_str(&format!(" · {notes}"));
    }
    line.push_str(&format!("\n  id: {}", item.id));
    line
}

fn render_section(title: &str, items: &[LineItemView]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let lines: Vec<String> = items.iter().map(render_item).collect();
    Some(format!("{title}\n{}", lines.join("\n")))
}

pub(crate) fn render_summary(summary: &Summary) -> String {
    let mut blocks = vec![format!("📊 Today\n{}", render_totals(&summary.totals))];
    blocks.extend(render_section("🖥 PC sessions", &summary.pcs));
    blocks.extend(render_section("🧾 Services", &summary.services));
    blocks.extend(render_section("💸 Expenses", &summary.expenses));
    blocks.join("\n\n")
}

pub(crate) fn render_items(noun: &str, items: &[LineItemView]) -> String {
    match render_section(&format!("Records: {noun}"), items) {
        Some(block) => block,
        None => format!("No {noun} records."),
    }
}

pub(crate) fn render_search(results: &SearchResponse) -> String {
    let mut blocks = Vec::new();
    blocks.extend(render_section("🖥 PC sessions", &results.pcs));
    blocks.extend(render_section("🧾 Services", &results.services));
    blocks.extend(render_section("💸 Expenses", &results.expenses));

    if blocks.is_empty() {
        "No matching records.".to_string()
    } else {
        blocks.join("\n\n")
    }
}

pub(crate) fn render_services(catalog: &ServicesResponse) -> String {
    if catalog.services.is_empty() {
        return "The service catalog is empty.".to_string();
    }

    let lines: Vec<String> = catalog
        .services
        .iter()
        .map(|service| {
            let mut line = format!("{} {} — {}", service.emoji, service.name, service.cost);
            if service.custom_cost {
                line.push_str(" (custom price allowed)");
            }
            line
        })
        .collect();
    format!("Services on offer:\n{}", lines.join("\n"))
}

pub(crate) fn day_closed(closed: &CloseDayResponse) -> String {
    let mut text = format!("📦 Day {} closed.\n{}", closed.date, render_totals(&closed.totals));
    match &closed.report {
        Some(report) => text.push_str(&format!("\nReport: {report}")),
        None => text.push_str("\n⚠ Report generation failed; totals are archived."),
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str, amount: i64) -> LineItemView {
        LineItemView {
            id: "id-1".to_string(),
            label: label.to_string(),
            amount,
            staff: "alice".to_string(),
            time: "01 Aug 2026 03:15 PM".to_string(),
            notes: None,
            date: None,
        }
    }

    #[test]
    fn summary_skips_empty_sections() {
        let summary = Summary {
            totals: Totals {
                pcs: 50,
                services: 0,
                expenses: 20,
                all: 30,
            },
            pcs: vec![item("PC 1", 50)],
            services: vec![],
            expenses: vec![item("Ink", 20)],
        };

        let text = render_summary(&summary);
        assert!(text.contains("Net: 30"));
        assert!(text.contains("PC 1"));
        assert!(!text.contains("🧾 Services"));
    }

    #[test]
    fn close_message_mentions_missing_report() {
        let closed = CloseDayResponse {
            date: "2026-08-01".to_string(),
            totals: Totals::default(),
            report: None,
        };
        assert!(day_closed(&closed).contains("Report generation failed"));
    }
}
