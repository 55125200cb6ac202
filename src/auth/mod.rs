pub mod security;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SecurityConfig;

pub use security::{decrypt_string, encrypt_string, verify_text, SecurityError};

/// Signed claim set: the projected (password-stripped) user object flattened
/// beside the standard timestamp claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub user: Map<String, Value>,
    pub exp: i64,
    pub iat: i64,
}

/// Short-lived access token plus long-lived refresh token, both carrying the
/// same claim set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("token generation failed: {0}")]
    TokenGeneration(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Issue a fresh access/refresh pair for the given projected user object.
pub fn issue_token_pair(
    user: Map<String, Value>,
    security: &SecurityConfig,
) -> Result<TokenPair, AuthError> {
    let now = Utc::now();
    let access_exp = now + Duration::hours(security.access_token_expiry_hours);
    let refresh_exp = now + Duration::days(security.refresh_token_expiry_days);

    let access_token = sign(
        Claims {
            user: user.clone(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        },
        security,
    )?;
    let refresh_token = sign(
        Claims {
            user,
            exp: refresh_exp.timestamp(),
            iat: now.timestamp(),
        },
        security,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Verify signature and expiry, returning the decoded claims. The standard
/// timestamp claims land in `exp`/`iat`; everything else is the user object.
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
    Ok(token_data.claims)
}

fn sign(claims: Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}
