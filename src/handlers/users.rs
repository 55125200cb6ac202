use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use super::AppState;
use crate::auth::security;
use crate::config;
use crate::database::models::USER_SCHEMA;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{messages, reply, Envelope};
use crate::query::filters::{apply_filters, USER_FILTER_RULES};
use crate::query::select::{select_string, DEFAULT_DESELECT, USER_DESELECT};
use crate::query::validate::{extract_valid_fields, validate_add, validate_update};

type Reply = (StatusCode, Json<Envelope>);

/// PUT /users - create a user from a validated payload.
pub async fn add_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Reply {
    let Some(payload) = body.as_object() else {
        return reply::bad_request(messages::MISSING_FIELDS, None);
    };

    let validation = validate_add(payload, USER_SCHEMA);
    if !validation.is_valid {
        return reply::bad_request(
            messages::MISSING_FIELDS,
            Some(json!({ "missing_fields": validation.missing_fields })),
        );
    }

    let mut fields = extract_valid_fields(payload, &validation.valid_fields);
    if let Err(err) = encrypt_password_field(&mut fields) {
        tracing::error!("password encryption failed: {}", err);
        return reply::failure();
    }

    match state.users.add(fields, &auth.email).await {
        Ok(user) => reply::created(messages::ADD_USER_SUCCESS, Some(user)),
        Err(err) => {
            tracing::error!("add user failed: {}", err);
            reply::failure()
        }
    }
}

/// GET /users - list users filtered by `status`, `type` and `gender`.
pub async fn list_users(
    State(state): State<AppState>,
    Query(mut params): Query<BTreeMap<String, String>>,
) -> Reply {
    apply_filters(&mut params, USER_FILTER_RULES);
    let projection = select_string(&[&DEFAULT_DESELECT, &USER_DESELECT]);

    match state.users.find(&params, &projection).await {
        Ok(users) => reply::ok(messages::GET_ALL_USERS, Some(Value::Array(users))),
        Err(err) => {
            tracing::error!("list users failed: {}", err);
            reply::failure()
        }
    }
}

/// GET /users/:id - fetch one user, active or not.
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let Ok(id) = Uuid::parse_str(&id) else {
        return reply::bad_request(messages::NO_UNIQUE_ID, None);
    };

    let projection = select_string(&[&DEFAULT_DESELECT, &USER_DESELECT]);
    match state.users.find_by_id(id, &projection).await {
        Ok(Some(user)) => reply::ok(messages::SINGLE_USER, Some(user)),
        Ok(None) => reply::no_records(),
        Err(err) => {
            tracing::error!("get user failed: {}", err);
            reply::failure()
        }
    }
}

/// DELETE /users/:id - flip the record inactive.
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let Ok(id) = Uuid::parse_str(&id) else {
        return reply::bad_request(messages::NO_UNIQUE_ID, None);
    };

    match state.users.soft_delete(id).await {
        Ok(()) => reply::ok(messages::DELETE_USER, None),
        Err(err) => {
            tracing::error!("delete user failed: {}", err);
            reply::failure()
        }
    }
}

/// POST /users - partial update; the body carries `_id`.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Reply {
    let Some(payload) = body.as_object() else {
        return reply::bad_request(messages::NO_UPDATE_FIELDS, None);
    };

    let validation = validate_update(payload, USER_SCHEMA);
    if !validation.is_valid {
        return reply::bad_request(messages::NO_UPDATE_FIELDS, None);
    }

    let Some(id) = payload
        .get("_id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
    else {
        return reply::bad_request(messages::NO_UNIQUE_ID, None);
    };

    let mut fields = extract_valid_fields(payload, &validation.valid_fields);
    if let Err(err) = encrypt_password_field(&mut fields) {
        tracing::error!("password encryption failed: {}", err);
        return reply::failure();
    }

    match state.users.update(id, fields, &auth.email).await {
        Ok(()) => reply::ok(messages::UPDATE_USER, None),
        Err(err) => {
            tracing::error!("update user failed: {}", err);
            reply::failure()
        }
    }
}

// Passwords are stored as ciphertext only; replace the plaintext before the
// payload reaches persistence.
fn encrypt_password_field(
    fields: &mut serde_json::Map<String, Value>,
) -> Result<(), security::SecurityError> {
    if let Some(Value::String(plaintext)) = fields.get("password") {
        let encrypted =
            security::encrypt_string(plaintext, &config::config().security.encryption_key)?;
        fields.insert("password".to_string(), Value::String(encrypted));
    }
    Ok(())
}
