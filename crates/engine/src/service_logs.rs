//! Durable mirror rows for sold services (`service_logs` table).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::line_items::{LineItemView, ServiceItem};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "service_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub log_id: String,
    pub service: String,
    pub amount: i64,
    pub staff: String,
    pub time: String,
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
            id: self.log_id,
            label: self.service,
            amount: self.amount,
            staff: self.staff,
            time: self.time,
            notes: None,
            date: Some(self.date),
        }
    }
}

pub(crate) fn active_from_item(
    item: &ServiceItem,
    date: &str,
    timestamp: DateTime<Utc>,
) -> ActiveModel {
    ActiveModel {
        log_id: ActiveValue::Set(item.log_id.clone()),
        service: ActiveValue::Set(item.service.clone()),
        amount: ActiveValue::Set(item.amount),
        staff: ActiveValue::Set(item.staff.clone()),
        time: ActiveValue::Set(item.time.clone()),
        period: ActiveValue::Set(item.period.clone()),
        date: ActiveValue::Set(date.to_string()),
        timestamp: ActiveValue::Set(timestamp),
    }
}
