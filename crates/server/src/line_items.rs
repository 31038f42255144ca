//! Line item API endpoints
//!
//! Three parallel route trios (`/sessions`, `/serviceLogs`, `/expenses`)
//! over the same engine operations; the handlers here only translate wire
//! types and apply the role-based staff scope.

use api_types::line_item::{
    Created, ExpenseNew, LineItemPatch, ListResponse, ServiceLogNew, SessionNew,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};
use engine::{Category, LedgerError, LineItemUpdate, NewLineItem, users};

pub(crate) fn map_view(view: engine::LineItemView) -> api_types::LineItemView {
    api_types::LineItemView {
        id: view.id,
        label: view.label,
        amount: view.amount,
        staff: view.staff,
        time: view.time,
        notes: view.notes,
        date: view.date,
    }
}

pub(crate) fn map_totals(totals: engine::Totals) -> api_types::Totals {
    api_types::Totals {
        pcs: totals.pcs,
        services: totals.services,
        expenses: totals.expenses,
        all: totals.all,
    }
}

/// Workers only ever see their own records; admins may scope freely.
pub(crate) fn staff_scope(user: &users::Model, requested: Option<String>) -> Option<String> {
    if user.is_admin() {
        requested
    } else {
        Some(user.username.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub staff: Option<String>,
}

async fn create(
    state: &ServerState,
    user: &users::Model,
    item: NewLineItem,
) -> Result<Json<Created>, ServerError> {
    let created = state.ledger.create_line_item(item, &user.username).await?;
    Ok(Json(Created {
        id: created.id,
        totals: map_totals(created.totals),
        mirrored: created.mirrored,
    }))
}

async fn list(
    state: &ServerState,
    user: &users::Model,
    category: Category,
    requested: Option<String>,
) -> Result<Json<ListResponse>, ServerError> {
    let scope = staff_scope(user, requested);
    let items = state
        .ledger
        .list_line_items(category, scope.as_deref())
        .await?;
    Ok(Json(ListResponse {
        items: items.into_iter().map(map_view).collect(),
    }))
}

async fn update(
    state: &ServerState,
    category: Category,
    id: String,
    patch: LineItemPatch,
) -> Result<StatusCode, ServerError> {
    let update = LineItemUpdate {
        label: patch.label,
        amount: patch.amount,
        notes: patch.notes,
    };
    if state.ledger.edit_line_item(category, &id, &update).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::Ledger(LedgerError::KeyNotFound(id)))
    }
}

async fn delete(
    state: &ServerState,
    category: Category,
    id: String,
) -> Result<StatusCode, ServerError> {
    if state.ledger.delete_line_item(category, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::Ledger(LedgerError::KeyNotFound(id)))
    }
}

pub async fn session_new(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SessionNew>,
) -> Result<Json<Created>, ServerError> {
    create(
        &state,
        &user,
        NewLineItem::Session {
            pc: payload.pc,
            amount: payload.amount,
            notes: payload.notes,
        },
    )
    .await
}

pub async fn session_list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ServerError> {
    list(&state, &user, Category::Session, query.staff).await
}

pub async fn session_update(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(patch): Json<LineItemPatch>,
) -> Result<StatusCode, ServerError> {
    update(&state, Category::Session, id, patch).await
}

pub async fn session_delete(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    delete(&state, Category::Session, id).await
}

pub async fn service_log_new(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ServiceLogNew>,
) -> Result<Json<Created>, ServerError> {
    // The catalog owns the price; the caller's amount only counts for
    // entries that allow custom costs.
    let amount = state
        .ledger
        .resolve_service_cost(&payload.service, payload.amount)
        .await?;
    create(
        &state,
        &user,
        NewLineItem::Service {
            service: payload.service,
            amount,
        },
    )
    .await
}

pub async fn service_log_list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ServerError> {
    list(&state, &user, Category::ServiceLog, query.staff).await
}

pub async fn service_log_update(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(patch): Json<LineItemPatch>,
) -> Result<StatusCode, ServerError> {
    update(&state, Category::ServiceLog, id, patch).await
}

pub async fn service_log_delete(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    delete(&state, Category::ServiceLog, id).await
}

pub async fn expense_new(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<Created>, ServerError> {
    create(
        &state,
        &user,
        NewLineItem::Expense {
            name: payload.name,
            amount: payload.amount,
        },
    )
    .await
}

pub async fn expense_list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ServerError> {
    list(&state, &user, Category::ExpenseLog, query.staff).await
}

pub async fn expense_update(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(patch): Json<LineItemPatch>,
) -> Result<StatusCode, ServerError> {
    update(&state, Category::ExpenseLog, id, patch).await
}

pub async fn expense_delete(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    delete(&state, Category::ExpenseLog, id).await
}
