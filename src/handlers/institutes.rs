use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use super::AppState;
use crate::database::models::INSTITUTE_SCHEMA;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{messages, reply, Envelope};
use crate::query::filters::{apply_filters, INSTITUTE_FILTER_RULES};
use crate::query::select::{select_string, DEFAULT_DESELECT};
use crate::query::validate::{extract_valid_fields, validate_add, validate_update};

type Reply = (StatusCode, Json<Envelope>);

/// PUT /institutes - create an institute.
pub async fn add_institute(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Reply {
    let Some(payload) = body.as_object() else {
        return reply::bad_request(messages::MISSING_FIELDS, None);
    };

    let validation = validate_add(payload, INSTITUTE_SCHEMA);
    if !validation.is_valid {
        return reply::bad_request(
            messages::MISSING_FIELDS,
            Some(json!({ "missing_fields": validation.missing_fields })),
        );
    }

    let fields = extract_valid_fields(payload, &validation.valid_fields);
    match state.institutes.add(fields, &auth.email).await {
        Ok(institute) => reply::created(messages::ADD_INSTITUTE_SUCCESS, Some(institute)),
        Err(err) => {
            tracing::error!("add institute failed: {}", err);
            reply::failure()
        }
    }
}

/// GET /institutes - list institutes.
pub async fn list_institutes(
    State(state): State<AppState>,
    Query(mut params): Query<BTreeMap<String, String>>,
) -> Reply {
    apply_filters(&mut params, INSTITUTE_FILTER_RULES);
    let projection = select_string(&[&DEFAULT_DESELECT]);

    match state.institutes.find(&params, &projection).await {
        Ok(institutes) => reply::ok(
            messages::GET_ALL_INSTITUTES,
            Some(Value::Array(institutes)),
        ),
        Err(err) => {
            tracing::error!("list institutes failed: {}", err);
            reply::failure()
        }
    }
}

/// GET /institutes/:id - fetch one institute.
pub async fn get_institute(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let Ok(id) = Uuid::parse_str(&id) else {
        return reply::bad_request(messages::NO_UNIQUE_ID, None);
    };

    let projection = select_string(&[&DEFAULT_DESELECT]);
    match state.institutes.find_by_id(id, &projection).await {
        Ok(Some(institute)) => reply::ok(messages::SINGLE_INSTITUTE, Some(institute)),
        Ok(None) => reply::no_records(),
        Err(err) => {
            tracing::error!("get institute failed: {}", err);
            reply::failure()
        }
    }
}

/// DELETE /institutes/:id - flip the record inactive.
pub async fn delete_institute(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let Ok(id) = Uuid::parse_str(&id) else {
        return reply::bad_request(messages::NO_UNIQUE_ID, None);
    };

    match state.institutes.soft_delete(id).await {
        Ok(()) => reply::ok(messages::DELETE_INSTITUTE, None),
        Err(err) => {
            tracing::error!("delete institute failed: {}", err);
            reply::failure()
        }
    }
}

/// POST /institutes - partial update; the body carries `_id`.
pub async fn update_institute(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Reply {
    let Some(payload) = body.as_object() else {
        return reply::bad_request(messages::NO_UPDATE_FIELDS, None);
    };

    let validation = validate_update(payload, INSTITUTE_SCHEMA);
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

    let fields = extract_valid_fields(payload, &validation.valid_fields);
    match state.institutes.update(id, fields, &auth.email).await {
        Ok(()) => reply::ok(messages::UPDATE_INSTITUTE, None),
        Err(err) => {
            tracing::error!("update institute failed: {}", err);
            reply::failure()
        }
    }
}
