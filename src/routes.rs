//! Router assembly. Everything except `/`, `/health` and `/login` sits
//! behind the bearer-token middleware.

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database;
use crate::handlers::{self, AppState};
use crate::middleware::jwt_auth_middleware;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login", post(handlers::auth::login))
        // Everything else requires a bearer token
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(institute_routes())
        .route("/refreshToken", post(handlers::auth::refresh_token))
        .layer(from_fn(jwt_auth_middleware))
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route(
            "/users",
            put(users::add_user)
                .get(users::list_users)
                .post(users::update_user),
        )
        .route(
            "/users/:id",
            get(users::get_user).delete(users::delete_user),
        )
}

fn institute_routes() -> Router<AppState> {
    use handlers::institutes;

    Router::new()
        .route(
            "/institutes",
            put(institutes::add_institute)
                .get(institutes::list_institutes)
                .post(institutes::update_institute),
        )
        .route(
            "/institutes/:id",
            get(institutes::get_institute).delete(institutes::delete_institute),
        )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "status": 200,
        "message": "portal API",
        "data": {
            "version": version,
            "endpoints": {
                "login": "POST /login (public)",
                "refresh": "POST /refreshToken (bearer)",
                "users": "/users[/:id] (bearer)",
                "institutes": "/institutes[/:id] (bearer)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": 200,
                "message": "ok",
                "data": { "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": 503,
                    "message": "database unavailable",
                    "data": { "timestamp": now }
                })),
            )
        }
    }
}
