//! The service catalog (`services` table).
//!
//! Catalog entries drive the service logging flow: they provide the choices,
//! the default price and whether the logger may override it. Names are
//! unique case-insensitively after NFKC normalization.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub cost: i64,
    pub emoji: String,
    pub available: bool,
    pub custom_cost: bool,
}

/// Field overrides for an existing catalog entry. `name` renames it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub cost: Option<i64>,
    pub emoji: Option<String>,
    pub available: Option<bool>,
    pub custom_cost: Option<bool>,
}

/// Canonical form used for uniqueness checks.
pub(crate) fn normalized(name: &str) -> String {
    name.trim().nfkc().collect::<String>().to_lowercase()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub cost: i64,
    pub emoji: String,
    pub available: bool,
    pub custom_cost: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Service {
    fn from(model: Model) -> Self {
        Self {
            name: model.name,
            cost: model.cost,
            emoji: model.emoji,
            available: model.available,
            custom_cost: model.custom_cost,
        }
    }
}

impl From<&Service> for ActiveModel {
    fn from(service: &Service) -> Self {
        Self {
            name: ActiveValue::Set(service.name.clone()),
            cost: ActiveValue::Set(service.cost),
            emoji: ActiveValue::Set(service.emoji.clone()),
            available: ActiveValue::Set(service.available),
            custom_cost: ActiveValue::Set(service.custom_cost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_folds_case_and_width() {
        assert_eq!(normalized("Printing"), normalized("printing"));
        assert_eq!(normalized(" Ｐｒｉｎｔｉｎｇ "), normalized("printing"));
        assert_ne!(normalized("Printing"), normalized("Scanning"));
    }
}
