use serde_json::{Map, Value};

/// One field of an entity's insert/update schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
}

/// Outcome of validating a request body against a schema. No branch throws;
/// callers decide what to do with `is_valid`.
#[derive(Debug, Clone)]
pub struct Validation {
    pub is_valid: bool,
    /// Required schema fields absent from the payload (add mode only).
    pub missing_fields: Vec<&'static str>,
    /// Payload keys that exist in the schema, in schema order.
    pub valid_fields: Vec<&'static str>,
}

/// Add-mode validation: every required schema field must be present in the
/// payload. Presence means the key exists; an explicit `null` still counts
/// as supplied.
pub fn validate_add(payload: &Map<String, Value>, schema: &[FieldSpec]) -> Validation {
    let valid_fields = supplied_schema_fields(payload, schema);
    let missing_fields: Vec<&'static str> = schema
        .iter()
        .filter(|spec| spec.required && !payload.contains_key(spec.name))
        .map(|spec| spec.name)
        .collect();

    Validation {
        is_valid: missing_fields.is_empty(),
        missing_fields,
        valid_fields,
    }
}

/// Update-mode validation: partial payloads are fine, but at least one
/// schema field has to be supplied for the update to mean anything.
pub fn validate_update(payload: &Map<String, Value>, schema: &[FieldSpec]) -> Validation {
    let valid_fields = supplied_schema_fields(payload, schema);

    Validation {
        is_valid: !valid_fields.is_empty(),
        missing_fields: Vec::new(),
        valid_fields,
    }
}

/// Keep only the validated keys of the payload. Everything else, including
/// attempts to set base fields like `rec_status` or audit columns directly,
/// is dropped before the payload reaches persistence.
pub fn extract_valid_fields(
    payload: &Map<String, Value>,
    valid_fields: &[&'static str],
) -> Map<String, Value> {
    valid_fields
        .iter()
        .filter_map(|name| {
            payload
                .get(*name)
                .map(|value| (name.to_string(), value.clone()))
        })
        .collect()
}

fn supplied_schema_fields(
    payload: &Map<String, Value>,
    schema: &[FieldSpec],
) -> Vec<&'static str> {
    schema
        .iter()
        .filter(|spec| payload.contains_key(spec.name))
        .map(|spec| spec.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: &[FieldSpec] = &[
        FieldSpec {
            name: "location",
            required: true,
        },
        FieldSpec {
            name: "description",
            required: true,
        },
        FieldSpec {
            name: "admin_id",
            required: false,
        },
    ];

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn add_mode_reports_missing_required_fields() {
        let body = payload(json!({"location": "pune"}));
        let result = validate_add(&body, SCHEMA);
        assert!(!result.is_valid);
        assert_eq!(result.missing_fields, vec!["description"]);
        assert_eq!(result.valid_fields, vec!["location"]);
    }

    #[test]
    fn add_mode_accepts_complete_payload() {
        let body = payload(json!({"location": "pune", "description": "main campus"}));
        let result = validate_add(&body, SCHEMA);
        assert!(result.is_valid);
        assert!(result.missing_fields.is_empty());
    }

    #[test]
    fn null_counts_as_present() {
        let body = payload(json!({"location": null, "description": ""}));
        let result = validate_add(&body, SCHEMA);
        assert!(result.is_valid);
    }

    #[test]
    fn update_mode_allows_partial_payload() {
        let body = payload(json!({"description": "renamed"}));
        let result = validate_update(&body, SCHEMA);
        assert!(result.is_valid);
        assert_eq!(result.valid_fields, vec!["description"]);
    }

    #[test]
    fn update_mode_rejects_payload_with_no_schema_fields() {
        // An update body carrying only `_id` has nothing to apply.
        let body = payload(json!({"_id": "i1"}));
        let result = validate_update(&body, SCHEMA);
        assert!(!result.is_valid);
        assert!(result.valid_fields.is_empty());
    }

    #[test]
    fn extraction_keeps_only_valid_fields() {
        let body = payload(json!({"location": "pune", "rec_status": "inactive", "x": 1}));
        let result = validate_update(&body, SCHEMA);
        let extracted = extract_valid_fields(&body, &result.valid_fields);
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted.get("location"), Some(&json!("pune")));
    }

    #[test]
    fn extraction_example_from_contract() {
        let body = payload(json!({"x": 1, "y": 2}));
        let extracted = extract_valid_fields(&body, &["x"]);
        assert_eq!(serde_json::to_value(extracted).unwrap(), json!({"x": 1}));
    }
}
