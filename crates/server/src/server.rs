use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, Error as AxumError, Header, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{catalog, day, line_items};
use engine::{Ledger, users};

static TELEGRAM_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("telegram-user-id");

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
    pub db: DatabaseConnection,
}

/// `TypedHeader` for custom telegram header
///
/// Telegram requests must contain "telegram-user-id" entry in the header.
#[derive(Debug)]
struct TelegramHeader(u64);

impl Header for TelegramHeader {
    fn name() -> &'static axum::http::HeaderName {
        &TELEGRAM_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let Ok(value) = value.parse() else {
            return Err(AxumError::invalid());
        };

        Ok(TelegramHeader(value))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        let as_string = self.0.to_string();
        match axum::http::HeaderValue::from_str(&as_string) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode telegram-user-id header"),
        }
    }
}

/// Basic-auth middleware.
///
/// The credentials resolve a `users` row; when the request carries a
/// `telegram-user-id` header (the bot forwarding on behalf of a chat user)
/// the paired user replaces the service account.
async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    telegram_header: Option<TypedHeader<TelegramHeader>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<users::Model> = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let mut user = if let Some(user) = user {
        user
    } else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    if let Some(header) = telegram_header {
        let header = header.0;
        let user_entry = users::Entity::find()
            .filter(users::Column::TelegramId.eq(header.0.to_string()))
            .one(&state.db)
            .await
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        user = if let Some(user) = user_entry {
            user
        } else {
            return Err(StatusCode::UNAUTHORIZED);
        };
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/sessions",
            post(line_items::session_new).get(line_items::session_list),
        )
        .route(
            "/sessions/{id}",
            axum::routing::patch(line_items::session_update).delete(line_items::session_delete),
        )
        .route(
            "/serviceLogs",
            post(line_items::service_log_new).get(line_items::service_log_list),
        )
        .route(
            "/serviceLogs/{id}",
            axum::routing::patch(line_items::service_log_update)
                .delete(line_items::service_log_delete),
        )
        .route(
            "/expenses",
            post(line_items::expense_new).get(line_items::expense_list),
        )
        .route(
            "/expenses/{id}",
            axum::routing::patch(line_items::expense_update).delete(line_items::expense_delete),
        )
        .route("/summary", get(day::summary))
        .route("/search", get(day::search))
        .route("/history", get(day::history))
        .route("/closeDay", post(day::close_day))
        .route(
            "/logChannel",
            post(day::log_channel_set).get(day::log_channel_get),
        )
        .route("/services", get(catalog::list).post(catalog::add))
        .route(
            "/services/{name}",
            axum::routing::patch(catalog::update).delete(catalog::remove),
        )
        .route("/services/{name}/toggle", post(catalog::toggle))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// The full application router; used directly by in-process tests.
pub fn app(ledger: Ledger, db: DatabaseConnection) -> Router {
    router(ServerState {
        ledger: Arc::new(ledger),
        db,
    })
}

pub async fn run(ledger: Ledger, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(ledger, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(ledger, db)).await
}

pub fn spawn_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(ledger, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
