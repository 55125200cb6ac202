use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::query::FieldSpec;

/// User roles stored in `user_type`. The store defaults new users to `user`.
pub mod user_type {
    pub const USER: &str = "user";
    pub const ADMIN: &str = "admin";
}

/// Audit and status columns shared by every entity, composed by value into
/// each entity struct.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BaseFields {
    pub id: Uuid,
    pub rec_status: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub base: BaseFields,
    pub full_name: String,
    pub gender: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub email: String,
    /// AES ciphertext; stripped from every projection and claim set.
    pub password: String,
    pub user_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Institute {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub base: BaseFields,
    pub location: String,
    pub description: String,
    pub admin_id: Option<Uuid>,
}

pub const USER_TABLE: &str = "users";
pub const INSTITUTE_TABLE: &str = "institutes";

pub const USER_COLUMNS: &[&str] = &[
    "id",
    "rec_status",
    "created_by",
    "created_at",
    "updated_by",
    "updated_at",
    "full_name",
    "gender",
    "phone_number",
    "address",
    "email",
    "password",
    "user_type",
];

pub const INSTITUTE_COLUMNS: &[&str] = &[
    "id",
    "rec_status",
    "created_by",
    "created_at",
    "updated_by",
    "updated_at",
    "location",
    "description",
    "admin_id",
];

/// Columns stored as `uuid`. Their values must bind with the uuid parameter
/// type; a TEXT parameter fails statement preparation against them.
pub const USER_UUID_COLUMNS: &[&str] = &["id"];
pub const INSTITUTE_UUID_COLUMNS: &[&str] = &["id", "admin_id"];

/// Insert/update schema for users. Base and audit fields are deliberately
/// absent so request bodies cannot set them.
pub const USER_SCHEMA: &[FieldSpec] = &[
    FieldSpec { name: "full_name", required: true },
    FieldSpec { name: "gender", required: true },
    FieldSpec { name: "phone_number", required: true },
    FieldSpec { name: "address", required: false },
    FieldSpec { name: "email", required: true },
    FieldSpec { name: "password", required: true },
    FieldSpec { name: "user_type", required: false },
];

pub const INSTITUTE_SCHEMA: &[FieldSpec] = &[
    FieldSpec { name: "location", required: true },
    FieldSpec { name: "description", required: true },
    FieldSpec { name: "admin_id", required: false },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_only_declare_entity_columns() {
        for spec in USER_SCHEMA.iter().chain(INSTITUTE_SCHEMA) {
            assert!(!["id", "rec_status", "created_by", "created_at", "updated_by", "updated_at"]
                .contains(&spec.name));
        }
        for spec in USER_SCHEMA {
            assert!(USER_COLUMNS.contains(&spec.name));
        }
        for spec in INSTITUTE_SCHEMA {
            assert!(INSTITUTE_COLUMNS.contains(&spec.name));
        }
    }

    #[test]
    fn user_serialization_flattens_base_fields() {
        let user = User {
            base: BaseFields {
                id: Uuid::nil(),
                rec_status: "active".to_string(),
                created_by: None,
                created_at: Utc::now(),
                updated_by: None,
                updated_at: None,
            },
            full_name: "Mohammad Adnan".to_string(),
            gender: "Male".to_string(),
            phone_number: "9874563524".to_string(),
            address: None,
            email: "adnan@example.com".to_string(),
            password: "cipher".to_string(),
            user_type: user_type::USER.to_string(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["rec_status"], "active");
        assert_eq!(value["email"], "adnan@example.com");
        assert!(value.get("base").is_none());
    }
}
