//! Service catalog API endpoints. Mutations are admin-only.

use api_types::catalog::{Service, ServicePatch, ServicesResponse, ToggleResponse};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};
use engine::{LedgerError, users};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// When true, only entries currently offered are returned.
    #[serde(default)]
    pub available: bool,
}

fn require_admin(user: &users::Model) -> Result<(), ServerError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ServerError::Ledger(LedgerError::Forbidden(
            "catalog changes require admin".to_string(),
        )))
    }
}

fn map_service(service: engine::Service) -> Service {
    Service {
        name: service.name,
        cost: service.cost,
        emoji: service.emoji,
        available: service.available,
        custom_cost: service.custom_cost,
    }
}

pub async fn list(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ServicesResponse>, ServerError> {
    let services = state.ledger.services(query.available).await?;
    Ok(Json(ServicesResponse {
        services: services.into_iter().map(map_service).collect(),
    }))
}

pub async fn add(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<Service>,
) -> Result<StatusCode, ServerError> {
    require_admin(&user)?;

    state
        .ledger
        .add_service(engine::Service {
            name: payload.name,
            cost: payload.cost,
            emoji: payload.emoji,
            available: payload.available,
            custom_cost: payload.custom_cost,
        })
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Json(patch): Json<ServicePatch>,
) -> Result<Json<Service>, ServerError> {
    require_admin(&user)?;

    let updated = state
        .ledger
        .update_service(
            &name,
            engine::ServiceUpdate {
                name: patch.name,
                cost: patch.cost,
                emoji: patch.emoji,
                available: patch.available,
                custom_cost: patch.custom_cost,
            },
        )
        .await?;
    Ok(Json(map_service(updated)))
}

pub async fn toggle(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<Json<ToggleResponse>, ServerError> {
    require_admin(&user)?;

    let available = state.ledger.toggle_service(&name).await?;
    Ok(Json(ToggleResponse { name, available }))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ServerError> {
    require_admin(&user)?;

    if state.ledger.delete_service(&name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::Ledger(LedgerError::KeyNotFound(name)))
    }
}
