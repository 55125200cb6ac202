use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::{Map, Value};

use crate::auth::{verify_token, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::response::messages;

/// Authenticated caller context extracted from a verified token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    /// Acting identity stamped into audit columns.
    pub email: String,
    /// Full projected claim set as issued at login.
    pub claims: Map<String, Value>,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let email = claims
            .user
            .get("email")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::unauthorized(messages::UNAUTHORIZED))?
            .to_string();
        Ok(Self {
            email,
            claims: claims.user,
        })
    }
}

/// Rejects requests without a valid bearer token before any protected
/// handler runs; on success the caller context is added to the request.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        extract_bearer(&headers).map_err(|_| ApiError::unauthorized(messages::UNAUTHORIZED))?;
    let claims = verify_token(&token, &config::config().security)?;

    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        Some(_) => Err("Empty bearer token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
