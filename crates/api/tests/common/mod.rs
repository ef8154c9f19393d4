#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use cpm_core::identity::UserIdentity;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use cpm_api::auth::jwt::{generate_token, JwtConfig};
use cpm_api::config::ServerConfig;
use cpm_api::routes;
use cpm_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            issuer: None,
            leeway_secs: 0,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3000".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

pub fn alice() -> UserIdentity {
    UserIdentity::new("alice@example.com", "Alice")
}

pub fn bob() -> UserIdentity {
    UserIdentity::new("bob@example.com", "Bob")
}

pub fn carol() -> UserIdentity {
    UserIdentity::new("carol@example.com", "Carol")
}

/// A valid bearer token for `user`, signed with the test secret.
pub fn token_for(user: &UserIdentity) -> String {
    generate_token(user, &test_config().jwt, 15).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<&UserIdentity>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token_for(user)));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, user: &UserIdentity) -> Response {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    user: &UserIdentity,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(user), Some(body)).await
}

pub async fn put_json_as(
    app: Router,
    uri: &str,
    user: &UserIdentity,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(user), Some(body)).await
}

pub async fn delete_as(app: Router, uri: &str, user: &UserIdentity) -> Response {
    send(app, Method::DELETE, uri, Some(user), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a project as `user`, returning the `data` object.
pub async fn create_project(pool: &PgPool, user: &UserIdentity, name: &str) -> serde_json::Value {
    let response = post_json_as(
        build_test_app(pool.clone()),
        "/api/v1/projects",
        user,
        serde_json::json!({ "name": name, "description": format!("About {name}") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Join a project as `user` through its invite code.
pub async fn join_project(pool: &PgPool, user: &UserIdentity, invite_code: &str) -> Response {
    post_json_as(
        build_test_app(pool.clone()),
        "/api/v1/projects/join",
        user,
        serde_json::json!({ "invite_code": invite_code }),
    )
    .await
}

/// Create a task in `project_id` as `user`, returning the `data` object.
pub async fn create_task(
    pool: &PgPool,
    user: &UserIdentity,
    project_id: i64,
    name: &str,
    assignee: Option<&UserIdentity>,
) -> serde_json::Value {
    let response = post_json_as(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/tasks"),
        user,
        serde_json::json!({
            "name": name,
            "description": "<p>Do the thing</p>",
            "price": 15000.0,
            "due_date": "2030-01-15T00:00:00Z",
            "assignee_email": assignee.map(|a| a.email.clone()),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Change a task's status as `user`.
pub async fn set_status(
    pool: &PgPool,
    user: &UserIdentity,
    task_id: i64,
    status: &str,
    solution: Option<&str>,
) -> Response {
    put_json_as(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{task_id}/status"),
        user,
        serde_json::json!({ "status": status, "solution": solution }),
    )
    .await
}
