//! Durable mirror rows for PC sessions (`pc_sessions` table).
//!
//! Each snapshot session is mirrored here with its calendar `date` and a
//! creation `timestamp`. The rows outlive the snapshot and stay editable
//! after the day is consolidated.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::line_items::{LineItemView, SessionItem};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "pc_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,
    pub pc: String,
    pub amount: i64,
    pub staff: String,
    pub time: String,
    pub notes: Option<String>,
    pub period: Option<String>,
    pub date: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn into_view(self) -> LineItemView {
        LineItemView {
            id: self.session_id,
            label: self.pc,
            amount: self.amount,
            staff: self.staff,
            time: self.time,
            notes: self.notes,
            date: Some(self.date),
        }
    }
}

pub(crate) fn active_from_item(
    item: &SessionItem,
    date: &str,
    timestamp: DateTime<Utc>,
) -> ActiveModel {
    ActiveModel {
        session_id: ActiveValue::Set(item.session_id.clone()),
        pc: ActiveValue::Set(item.pc.clone()),
        amount: ActiveValue::Set(item.amount),
        staff: ActiveValue::Set(item.staff.clone()),
        time: ActiveValue::Set(item.time.clone()),
        notes: ActiveValue::Set(item.notes.clone()),
        period: ActiveValue::Set(item.period.clone()),
        date: ActiveValue::Set(date.to_string()),
        timestamp: ActiveValue::Set(timestamp),
    }
}
