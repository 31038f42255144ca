//! Day-level API endpoints: summary, search, history, close-out and the
//! report-channel binding.

use api_types::{
    close::CloseDayResponse,
    history::{ArchivedDay, HistoryResponse},
    log_channel::{LogChannelResponse, LogChannelSet},
    search::{SearchQuery, SearchResponse},
    summary::Summary,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{
    ServerError,
    line_items::{map_totals, map_view, staff_scope},
    server::ServerState,
};
use engine::{LedgerError, LineItemView, Snapshot, users};

fn snapshot_views(snapshot: &Snapshot) -> (Vec<LineItemView>, Vec<LineItemView>, Vec<LineItemView>) {
    let pcs = snapshot
        .pcs
        .iter()
        .map(|item| LineItemView::from_item(item, item.notes.clone()))
        .collect();
    let services = snapshot
        .services
        .iter()
        .map(|item| LineItemView::from_item(item, None))
        .collect();
    let expenses = snapshot
        .expenses
        .iter()
        .map(|item| LineItemView::from_item(item, None))
        .collect();
    (pcs, services, expenses)
}

pub async fn summary(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Summary>, ServerError> {
    let snapshot = state.ledger.current_day().await;
    let (pcs, services, expenses) = snapshot_views(&snapshot);

    Ok(Json(Summary {
        totals: map_totals(snapshot.totals),
        pcs: pcs.into_iter().map(map_view).collect(),
        services: services.into_iter().map(map_view).collect(),
        expenses: expenses.into_iter().map(map_view).collect(),
    }))
}

pub async fn search(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ServerError> {
    let scope = staff_scope(&user, query.staff);
    let results = state.ledger.search(&query.q, scope.as_deref()).await?;

    Ok(Json(SearchResponse {
        pcs: results.pcs.into_iter().map(map_view).collect(),
        services: results.services.into_iter().map(map_view).collect(),
        expenses: results.expenses.into_iter().map(map_view).collect(),
    }))
}

pub async fn history(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let days = state.ledger.history().await?;

    let days = days
        .into_iter()
        .map(|day| {
            let (pcs, services, expenses) = snapshot_views(&day.snapshot);
            ArchivedDay {
                date: day.date,
                totals: map_totals(day.snapshot.totals),
                pcs: pcs.into_iter().map(map_view).collect(),
                services: services.into_iter().map(map_view).collect(),
                expenses: expenses.into_iter().map(map_view).collect(),
            }
        })
        .collect();

    Ok(Json(HistoryResponse { days }))
}

pub async fn close_day(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<CloseDayResponse>, ServerError> {
    if !user.is_admin() {
        return Err(ServerError::Ledger(LedgerError::Forbidden(
            "closing the day requires admin".to_string(),
        )));
    }

    let archived = state.ledger.consolidate_day().await?;
    Ok(Json(CloseDayResponse {
        date: archived.date,
        totals: map_totals(archived.snapshot.totals),
        report: archived.report.map(|path| path.display().to_string()),
    }))
}

pub async fn log_channel_set(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<LogChannelSet>,
) -> Result<Json<LogChannelResponse>, ServerError> {
    state.ledger.set_log_channel(payload.channel_id).await?;
    Ok(Json(LogChannelResponse {
        channel_id: payload.channel_id,
    }))
}

pub async fn log_channel_get(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<LogChannelResponse>, ServerError> {
    Ok(Json(LogChannelResponse {
        channel_id: state.ledger.log_channel().await,
    }))
}
