//! Running totals of the current day.

use serde::{Deserialize, Serialize};

use crate::line_items::{ExpenseItem, LineItem, ServiceItem, SessionItem};

/// Per-category and net totals of a snapshot.
///
/// Stored inside the snapshot blob for display, but never read back as
/// authoritative: [`Totals::of`] recomputes it from the sequences after
/// every mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default)]
    pub pcs: i64,
    #[serde(default)]
    pub services: i64,
    #[serde(default)]
    pub expenses: i64,
    #[serde(default)]
    pub all: i64,
}

impl Totals {
    /// Recompute totals from the three line item sequences.
    ///
    /// `all = pcs + services - expenses` holds by construction.
    pub fn of(pcs: &[SessionItem], services: &[ServiceItem], expenses: &[ExpenseItem]) -> Self {
        let pcs_total = sum(pcs);
        let services_total = sum(services);
        let expenses_total = sum(expenses);

        Self {
            pcs: pcs_total,
            services: services_total,
            expenses: expenses_total,
            all: pcs_total + services_total - expenses_total,
        }
    }
}

fn sum<T: LineItem>(items: &[T]) -> i64 {
    items.iter().map(LineItem::amount).sum()
}

/// Renders the playing time a PC session fee buys.
///
/// One unit of currency buys six minutes.
pub fn cost_to_time(cost: i64) -> String {
    let minutes = cost * 6;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(amount: i64) -> SessionItem {
        SessionItem {
            session_id: format!("s-{amount}"),
            pc: "PC 1".to_string(),
            amount,
            staff: "yousef".to_string(),
            time: "01 Jan 2026 10:00 AM".to_string(),
            notes: None,
            period: None,
        }
    }

    fn service(amount: i64) -> ServiceItem {
        ServiceItem {
            log_id: format!("v-{amount}"),
            service: "Printing".to_string(),
            amount,
            staff: "yousef".to_string(),
            time: "01 Jan 2026 10:00 AM".to_string(),
            period: None,
        }
    }

    fn expense(amount: i64) -> ExpenseItem {
        ExpenseItem {
            log_id: format!("e-{amount}"),
            name: "Coffee".to_string(),
            amount,
            staff: "yousef".to_string(),
            time: "01 Jan 2026 10:00 AM".to_string(),
            period: None,
        }
    }

    #[test]
    fn totals_hold_net_invariant() {
        let totals = Totals::of(
            &[session(50), session(25)],
            &[service(30)],
            &[expense(20), expense(5)],
        );

        assert_eq!(totals.pcs, 75);
        assert_eq!(totals.services, 30);
        assert_eq!(totals.expenses, 25);
        assert_eq!(totals.all, totals.pcs + totals.services - totals.expenses);
    }

    #[test]
    fn empty_sequences_total_zero() {
        assert_eq!(Totals::of(&[], &[], &[]), Totals::default());
    }

    #[test]
    fn cost_buys_six_minutes_per_unit() {
        assert_eq!(cost_to_time(10), "1h 0m");
        assert_eq!(cost_to_time(25), "2h 30m");
        assert_eq!(cost_to_time(0), "0h 0m");
    }
}
