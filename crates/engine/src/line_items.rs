//! Line item primitives.
//!
//! A line item is one recorded activity: a paid PC session, a sold service or
//! an expense. Each variant keeps its historical field names (`session_id`,
//! `log_id`, `pc`, `service`, `name`) so existing snapshot blobs and durable
//! rows stay readable.

use serde::{Deserialize, Serialize};

use crate::{LedgerError, ResultLedger};

/// The three line item categories of a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Session,
    ServiceLog,
    ExpenseLog,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::ServiceLog => "service_log",
            Self::ExpenseLog => "expense_log",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "session" => Ok(Self::Session),
            "service_log" => Ok(Self::ServiceLog),
            "expense_log" => Ok(Self::ExpenseLog),
            other => Err(LedgerError::Validation(format!(
                "invalid category: {other}"
            ))),
        }
    }
}

/// A paid PC session in the live snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionItem {
    pub session_id: String,
    pub pc: String,
    pub amount: i64,
    pub staff: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// A sold service in the live snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub log_id: String,
    pub service: String,
    pub amount: i64,
    pub staff: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// An expense in the live snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub log_id: String,
    pub name: String,
    pub amount: i64,
    pub staff: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// Common access to the three line item shapes.
///
/// `label` is the category-specific name field: the PC designation for
/// sessions, the service name for service logs, the expense name for
/// expense logs.
pub trait LineItem {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
    fn amount(&self) -> i64;
    fn staff(&self) -> &str;
    fn time(&self) -> &str;
    fn apply(&mut self, update: &LineItemUpdate);
}

impl LineItem for SessionItem {
    fn id(&self) -> &str {
        &self.session_id
    }

    fn label(&self) -> &str {
        &self.pc
    }

    fn amount(&self) -> i64 {
        self.amount
    }

    fn staff(&self) -> &str {
        &self.staff
    }

    fn time(&self) -> &str {
        &self.time
    }

    fn apply(&mut self, update: &LineItemUpdate) {
        if let Some(label) = &update.label {
            self.pc = label.clone();
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
    }
}

impl LineItem for ServiceItem {
    fn id(&self) -> &str {
        &self.log_id
    }

    fn label(&self) -> &str {
        &self.service
    }

    fn amount(&self) -> i64 {
        self.amount
    }

    fn staff(&self) -> &str {
        &self.staff
    }

    fn time(&self) -> &str {
        &self.time
    }

    fn apply(&mut self, update: &LineItemUpdate) {
        if let Some(label) = &update.label {
            self.service = label.clone();
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
    }
}

impl LineItem for ExpenseItem {
    fn id(&self) -> &str {
        &self.log_id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn amount(&self) -> i64 {
        self.amount
    }

    fn staff(&self) -> &str {
        &self.staff
    }

    fn time(&self) -> &str {
        &self.time
    }

    fn apply(&mut self, update: &LineItemUpdate) {
        if let Some(label) = &update.label {
            self.name = label.clone();
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
    }
}

/// Fields for a line item about to be created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewLineItem {
    Session {
        pc: String,
        amount: i64,
        notes: Option<String>,
    },
    Service {
        service: String,
        amount: i64,
    },
    Expense {
        name: String,
        amount: i64,
    },
}

impl NewLineItem {
    pub fn category(&self) -> Category {
        match self {
            Self::Session { .. } => Category::Session,
            Self::Service { .. } => Category::ServiceLog,
            Self::Expense { .. } => Category::ExpenseLog,
        }
    }

    pub fn amount(&self) -> i64 {
        match self {
            Self::Session { amount, .. }
            | Self::Service { amount, .. }
            | Self::Expense { amount, .. } => *amount,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Session { pc, .. } => pc,
            Self::Service { service, .. } => service,
            Self::Expense { name, .. } => name,
        }
    }

    pub(crate) fn validate(&self) -> ResultLedger<()> {
        if self.label().trim().is_empty() {
            return Err(LedgerError::Validation(format!(
                "{} name is required",
                self.category().as_str()
            )));
        }
        if self.amount() <= 0 {
            return Err(LedgerError::Validation(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Field overrides for an existing line item.
///
/// `label` follows the category naming (see [`LineItem::label`]); `notes`
/// only applies to sessions and is ignored for the other categories.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemUpdate {
    pub label: Option<String>,
    pub amount: Option<i64>,
    pub notes: Option<String>,
}

impl LineItemUpdate {
    pub(crate) fn validate(&self) -> ResultLedger<()> {
        if let Some(amount) = self.amount
            && amount <= 0
        {
            return Err(LedgerError::Validation(
                "amount must be > 0".to_string(),
            ));
        }
        if let Some(label) = &self.label
            && label.trim().is_empty()
        {
            return Err(LedgerError::Validation("name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// A line item as returned by list/search: the union of the live snapshot
/// and the durable rows.
///
/// `date` is the calendar day of the durable row; it is `None` for items
/// still living only in the open snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemView {
    pub id: String,
    pub label: String,
    pub amount: i64,
    pub staff: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl LineItemView {
    pub fn from_item<T: LineItem>(item: &T, notes: Option<String>) -> Self {
        Self {
            id: item.id().to_string(),
            label: item.label().to_string(),
            amount: item.amount(),
            staff: item.staff().to_string(),
            time: item.time().to_string(),
            notes,
            date: None,
        }
    }

    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
            || self.staff.to_lowercase().contains(needle)
            || self.amount.to_string().contains(needle)
    }
}
