use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message text used across handler responses.
pub mod messages {
    pub const MISSING_FIELDS: &str = "Required fields are missing";
    pub const NO_UPDATE_FIELDS: &str = "No fields to update";
    pub const NO_UNIQUE_ID: &str = "No record id supplied";
    pub const NO_RECORDS: &str = "No records found";
    pub const UNAUTHORIZED: &str = "Unauthorized access";
    pub const USER_AUTHENTICATED: &str = "User authenticated";
    pub const USER_NOT_AUTHENTICATED: &str = "User not authenticated";
    pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

    pub const ADD_USER_SUCCESS: &str = "User added successfully";
    pub const GET_ALL_USERS: &str = "All users data fetched successfully";
    pub const SINGLE_USER: &str = "Single user data fetched successfully";
    pub const DELETE_USER: &str = "User deleted successfully";
    pub const UPDATE_USER: &str = "User updated successfully";

    pub const ADD_INSTITUTE_SUCCESS: &str = "Institute added successfully";
    pub const GET_ALL_INSTITUTES: &str = "Institute data fetched successfully";
    pub const SINGLE_INSTITUTE: &str = "Single institute data fetched successfully";
    pub const DELETE_INSTITUTE: &str = "Institute deleted successfully";
    pub const UPDATE_INSTITUTE: &str = "Institute updated successfully";
}

/// The uniform response shape every endpoint replies with, success or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn new(status: u16, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Constructors mirroring the handler branches. Each returns the HTTP status
/// paired with the envelope so the two can diverge where the API contract
/// requires it (see [`no_records`]).
pub mod reply {
    use super::*;

    pub fn ok(message: &str, data: Option<Value>) -> (StatusCode, Json<Envelope>) {
        (StatusCode::OK, Json(Envelope::new(200, message, data)))
    }

    pub fn created(message: &str, data: Option<Value>) -> (StatusCode, Json<Envelope>) {
        (StatusCode::CREATED, Json(Envelope::new(201, message, data)))
    }

    /// Empty query results reply with HTTP 200 carrying a 404-status body.
    /// Unconventional, but clients depend on it.
    pub fn no_records() -> (StatusCode, Json<Envelope>) {
        (
            StatusCode::OK,
            Json(Envelope::new(404, messages::NO_RECORDS, None)),
        )
    }

    pub fn bad_request(message: &str, data: Option<Value>) -> (StatusCode, Json<Envelope>) {
        (
            StatusCode::BAD_REQUEST,
            Json(Envelope::new(400, message, data)),
        )
    }

    pub fn unauthorized(message: &str) -> (StatusCode, Json<Envelope>) {
        (
            StatusCode::UNAUTHORIZED,
            Json(Envelope::new(401, message, None)),
        )
    }

    pub fn failure() -> (StatusCode, Json<Envelope>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Envelope::new(500, messages::INTERNAL_SERVER_ERROR, None)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_serializes_with_data() {
        let envelope = Envelope::new(200, "ok", Some(json!({"id": 1})));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"status": 200, "message": "ok", "data": {"id": 1}}));
    }

    #[test]
    fn envelope_omits_absent_data() {
        let envelope = Envelope::new(400, "bad", None);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"status": 400, "message": "bad"}));
    }

    #[test]
    fn no_records_is_http_ok_with_not_found_body() {
        let (status, body) = reply::no_records();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, 404);
        assert_eq!(body.message, messages::NO_RECORDS);
    }
}
