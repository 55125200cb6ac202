use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use super::AppState;
use crate::auth::{issue_token_pair, security, verify_token};
use crate::config;
use crate::middleware::auth::extract_bearer;
use crate::middleware::response::{messages, reply, Envelope};
use crate::query::select::{strip_fields, DEFAULT_DESELECT, USER_DESELECT};

type Reply = (StatusCode, Json<Envelope>);

/// POST /login - authenticate by email and password, returning an
/// access/refresh token pair whose claims are the projected user record.
pub async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> Reply {
    let (Some(email), Some(password)) = (
        body.get("email").and_then(Value::as_str),
        body.get("password").and_then(Value::as_str),
    ) else {
        return reply::unauthorized(messages::UNAUTHORIZED);
    };

    let user = match state.users.find_for_login(email).await {
        Ok(Some(user)) => user,
        Ok(None) => return reply::no_records(),
        Err(err) => {
            tracing::error!("login lookup failed: {}", err);
            return reply::failure();
        }
    };

    let security_config = &config::config().security;
    if !security::verify_text(password, &user.password, &security_config.encryption_key) {
        return reply::unauthorized(messages::USER_NOT_AUTHENTICATED);
    }

    let serialized = match serde_json::to_value(&user) {
        Ok(value) => value,
        Err(err) => {
            tracing::error!("user serialization failed: {}", err);
            return reply::failure();
        }
    };
    let projected = strip_fields(serialized, &[&DEFAULT_DESELECT, &USER_DESELECT]);
    let claims = projected.as_object().cloned().unwrap_or_default();

    match issue_token_pair(claims, security_config) {
        Ok(pair) => match serde_json::to_value(pair) {
            Ok(tokens) => reply::ok(messages::USER_AUTHENTICATED, Some(tokens)),
            Err(err) => {
                tracing::error!("token serialization failed: {}", err);
                reply::failure()
            }
        },
        Err(err) => {
            tracing::error!("token issuance failed: {}", err);
            reply::failure()
        }
    }
}

/// POST /refreshToken - verify the presented bearer token and reissue a
/// fresh pair carrying the same user claims, minus the old timestamps.
pub async fn refresh_token(headers: HeaderMap) -> Reply {
    let Ok(token) = extract_bearer(&headers) else {
        return reply::unauthorized(messages::UNAUTHORIZED);
    };

    let security_config = &config::config().security;
    let claims = match verify_token(&token, security_config) {
        Ok(claims) => claims,
        Err(_) => return reply::unauthorized(messages::UNAUTHORIZED),
    };

    // Claims decode with exp/iat split off, so reissuing from the user
    // object alone drops the old timestamps.
    match issue_token_pair(claims.user, security_config) {
        Ok(pair) => match serde_json::to_value(pair) {
            Ok(tokens) => reply::ok(messages::USER_AUTHENTICATED, Some(tokens)),
            Err(err) => {
                tracing::error!("token serialization failed: {}", err);
                reply::failure()
            }
        },
        Err(err) => {
            tracing::error!("token issuance failed: {}", err);
            reply::failure()
        }
    }
}
