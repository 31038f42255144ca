use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::LedgerError;

use serde::Serialize;
pub use server::{app, run, run_with_listener, spawn_with_listener};

mod catalog;
mod day;
mod line_items;
mod server;

pub mod types {
    pub use api_types::{LineItemView, Totals};

    pub mod line_item {
        pub use api_types::line_item::{
            Created, ExpenseNew, LineItemPatch, ListResponse, ServiceLogNew, SessionNew,
        };
    }

    pub mod summary {
        pub use api_types::summary::Summary;
    }

    pub mod search {
        pub use api_types::search::{SearchQuery, SearchResponse};
    }

    pub mod catalog {
        pub use api_types::catalog::{Service, ServicePatch, ServicesResponse, ToggleResponse};
    }

    pub mod history {
        pub use api_types::history::{ArchivedDay, HistoryResponse};
    }

    pub mod close {
        pub use api_types::close::CloseDayResponse;
    }

    pub mod log_channel {
        pub use api_types::log_channel::{LogChannelResponse, LogChannelSet};
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::Forbidden(_) => StatusCode::FORBIDDEN,
        LedgerError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::ExistingKey(_) => StatusCode::CONFLICT,
        LedgerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LedgerError::Snapshot(_) | LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        LedgerError::Snapshot(msg) => {
            tracing::error!("snapshot error: {msg}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => {
                (status_for_ledger_error(&err), message_for_ledger_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_forbidden_maps_to_403() {
        let res = ServerError::from(LedgerError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn ledger_not_found_maps_to_404() {
        let res = ServerError::from(LedgerError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn ledger_conflict_maps_to_409() {
        let res = ServerError::from(LedgerError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn ledger_validation_maps_to_422() {
        let res = ServerError::from(LedgerError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn ledger_storage_maps_to_500() {
        let res = ServerError::from(LedgerError::Snapshot("disk".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
