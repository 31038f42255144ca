use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ActiveValue, Database, EntityTrait};
use tower::ServiceExt;

use engine::users;
use migration::MigratorTrait;

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    users::Entity::insert_many([
        users::ActiveModel {
            username: ActiveValue::Set("alice".to_string()),
            password: ActiveValue::Set("password".to_string()),
            role: ActiveValue::Set("worker".to_string()),
            telegram_id: ActiveValue::Set(Some("1111".to_string())),
        },
        users::ActiveModel {
            username: ActiveValue::Set("boss".to_string()),
            password: ActiveValue::Set("secret".to_string()),
            role: ActiveValue::Set("admin".to_string()),
            telegram_id: ActiveValue::Set(None),
        },
    ])
    .exec(&db)
    .await
    .unwrap();

    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_api");
    std::fs::create_dir_all(&dir).unwrap();
    let tag = uuid::Uuid::new_v4();

    let ledger = engine::Ledger::builder()
        .database(db.clone())
        .snapshot_path(dir.join(format!("day_{tag}.json")))
        .reports_dir(dir.join(format!("reports_{tag}")))
        .build()
        .unwrap();

    server::app(ledger, db)
}

fn basic(username: &str, password: &str) -> String {
    let secret = format!("{username}:{password}");
    format!(
        "Basic {}",
        base64::prelude::BASE64_STANDARD.encode(secret)
    )
}

fn request(method: &str, uri: &str, auth: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, auth);
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn rejects_missing_credentials() {
    let app = test_app().await;

    let response = app
        .oneshot(Request::get("/summary").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejects_wrong_credentials() {
    let app = test_app().await;

    let response = app
        .oneshot(request(
            "GET",
            "/summary",
            &basic("alice", "not-the-password"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_create_then_list_and_summary() {
    let app = test_app().await;
    let auth = basic("alice", "password");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/sessions",
            &auth,
            Some(serde_json::json!({"pc": "PC 1", "amount": 50})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = json_body(response).await;
    assert!(created["mirrored"].as_bool().unwrap());
    assert_eq!(created["totals"]["pcs"], 50);
    assert_eq!(created["totals"]["all"], 50);

    let response = app
        .clone()
        .oneshot(request("GET", "/sessions", &auth, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = json_body(response).await;
    assert_eq!(listed["items"].as_array().unwrap().len(), 1);
    assert_eq!(listed["items"][0]["label"], "PC 1");
    assert_eq!(listed["items"][0]["staff"], "alice");

    let response = app
        .oneshot(request("GET", "/summary", &auth, None))
        .await
        .unwrap();
    let summary = json_body(response).await;
    assert_eq!(summary["totals"]["all"], 50);
    assert_eq!(summary["pcs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_line_item_is_unprocessable() {
    let app = test_app().await;

    let response = app
        .oneshot(request(
            "POST",
            "/sessions",
            &basic("alice", "password"),
            Some(serde_json::json!({"pc": "PC 1", "amount": 0})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid input"));
}

#[tokio::test]
async fn workers_only_see_their_own_records() {
    let app = test_app().await;

    for (auth, pc) in [
        (basic("alice", "password"), "PC 1"),
        (basic("boss", "secret"), "PC 2"),
    ] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/sessions",
                &auth,
                Some(serde_json::json!({"pc": pc, "amount": 10})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/sessions", &basic("alice", "password"), None))
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed["items"].as_array().unwrap().len(), 1);
    assert_eq!(listed["items"][0]["staff"], "alice");

    // Admins see everything, and may scope to a worker explicitly.
    let response = app
        .clone()
        .oneshot(request("GET", "/sessions", &basic("boss", "secret"), None))
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed["items"].as_array().unwrap().len(), 2);

    let response = app
        .oneshot(request(
            "GET",
            "/sessions?staff=alice",
            &basic("boss", "secret"),
            None,
        ))
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed["items"].as_array().unwrap().len(), 1);
    assert_eq!(listed["items"][0]["staff"], "alice");
}

#[tokio::test]
async fn patch_of_unknown_id_is_not_found() {
    let app = test_app().await;

    let response = app
        .oneshot(request(
            "PATCH",
            "/sessions/no-such-id",
            &basic("alice", "password"),
            Some(serde_json::json!({"amount": 20})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_and_delete_roundtrip() {
    let app = test_app().await;
    let auth = basic("alice", "password");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/expenses",
            &auth,
            Some(serde_json::json!({"name": "Ink", "amount": 30})),
        ))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/expenses/{id}"),
            &auth,
            Some(serde_json::json!({"amount": 25})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request("GET", "/summary", &auth, None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["totals"]["expenses"], 25);

    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/expenses/{id}"), &auth, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request("DELETE", &format!("/expenses/{id}"), &auth, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_mutations_require_admin() {
    let app = test_app().await;
    let entry = serde_json::json!({
        "name": "Printing",
        "cost": 10,
        "emoji": "🖨",
        "available": true,
        "custom_cost": false
    });

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/services",
            &basic("alice", "password"),
            Some(entry.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/services",
            &basic("boss", "secret"),
            Some(entry.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Duplicate names conflict, case-insensitively.
    let mut duplicate = entry;
    duplicate["name"] = serde_json::json!("printing");
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/services",
            &basic("boss", "secret"),
            Some(duplicate),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Everyone may read the catalog.
    let response = app
        .oneshot(request("GET", "/services", &basic("alice", "password"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["services"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn service_log_price_comes_from_the_catalog() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/services",
            &basic("boss", "secret"),
            Some(serde_json::json!({
                "name": "Printing",
                "cost": 10,
                "emoji": "",
                "available": true,
                "custom_cost": false
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The caller's amount is ignored for fixed-price entries.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/serviceLogs",
            &basic("alice", "password"),
            Some(serde_json::json!({"service": "Printing", "amount": 99})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["totals"]["services"], 10);

    let response = app
        .oneshot(request(
            "POST",
            "/serviceLogs",
            &basic("alice", "password"),
            Some(serde_json::json!({"service": "Lamination"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn close_day_requires_admin_and_archives() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/sessions",
            &basic("alice", "password"),
            Some(serde_json::json!({"pc": "PC 1", "amount": 40})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request("POST", "/closeDay", &basic("alice", "password"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request("POST", "/closeDay", &basic("boss", "secret"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let closed = json_body(response).await;
    assert_eq!(closed["totals"]["all"], 40);
    assert!(closed["report"].as_str().is_some());

    let response = app
        .clone()
        .oneshot(request("GET", "/summary", &basic("boss", "secret"), None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["totals"]["all"], 0);

    let response = app
        .oneshot(request("GET", "/history", &basic("boss", "secret"), None))
        .await
        .unwrap();
    let history = json_body(response).await;
    assert_eq!(history["days"].as_array().unwrap().len(), 1);
    assert_eq!(history["days"][0]["totals"]["all"], 40);
}

#[tokio::test]
async fn telegram_header_resolves_the_paired_user() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::post("/sessions")
                .header(header::AUTHORIZATION, basic("boss", "secret"))
                .header("telegram-user-id", "1111")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"pc": "PC 1", "amount": 15}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request("GET", "/sessions", &basic("boss", "secret"), None))
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed["items"][0]["staff"], "alice");

    // An unpaired telegram id is rejected.
    let response = app
        .oneshot(
            Request::get("/summary")
                .header(header::AUTHORIZATION, basic("boss", "secret"))
                .header("telegram-user-id", "9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn log_channel_roundtrip() {
    let app = test_app().await;
    let auth = basic("alice", "password");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/logChannel",
            &auth,
            Some(serde_json::json!({"channel_id": -100123})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", "/logChannel", &auth, None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["channel_id"], -100123);
}
