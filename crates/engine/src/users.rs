//! Users table (minimal entity).
//!
//! The server authenticates against this table; `role` gates the admin-only
//! flows (service catalog management, other users' records).

use sea_orm::entity::prelude::*;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_WORKER: &str = "worker";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub role: String,
    pub telegram_id: Option<String>,
}

impl Model {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
