use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::{json, Value};

use portal_api::auth::issue_token_pair;
use portal_api::config;
use portal_api::handlers::AppState;
use portal_api::routes;

/// Build the full router over a lazy pool that never connects. Requests
/// that stop before persistence (auth rejections, validation failures)
/// behave exactly as in production; requests that do reach the database
/// fail with a connection error.
pub fn app() -> Router {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://nobody@127.0.0.1:1/unreachable")
        .expect("lazy pool");
    routes::app(AppState::new(pool))
}

/// A valid bearer token signed with the process-wide config, carrying the
/// minimal claim set the middleware requires.
pub fn bearer() -> String {
    let claims = json!({"id": "00000000-0000-0000-0000-000000000000", "email": "tester@example.com"})
        .as_object()
        .cloned()
        .expect("claims object");
    let pair = issue_token_pair(claims, &config::config().security).expect("token pair");
    format!("Bearer {}", pair.access_token)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn get_authed(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, bearer())
        .body(Body::empty())
        .expect("request")
}

pub fn json_request(method: &str, uri: &str, body: Value, authed: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if authed {
        builder = builder.header(header::AUTHORIZATION, bearer());
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
