use serde_json::Value;

/// Whether a field list is an inclusion or exclusion projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    Select,
    Deselect,
}

/// A declarative projection group: a mode plus the fields it covers.
#[derive(Debug, Clone, Copy)]
pub struct SelectMeta {
    pub mode: SelectMode,
    pub fields: &'static [&'static str],
}

/// Audit columns hidden from every outbound record.
pub const DEFAULT_DESELECT: SelectMeta = SelectMeta {
    mode: SelectMode::Deselect,
    fields: &["created_by", "created_at", "updated_by", "updated_at"],
};

/// The password column never leaves the API.
pub const USER_DESELECT: SelectMeta = SelectMeta {
    mode: SelectMode::Deselect,
    fields: &["password"],
};

/// Render one or more projection groups into the select string consumed by
/// the query layer: `"a b"` for inclusion, `"-a -b"` for exclusion.
///
/// All groups passed together must share the same mode; the mode of the
/// first group wins and mixing produces an incorrect projection. That is a
/// caller obligation, not something this function validates.
pub fn select_string(metas: &[&SelectMeta]) -> String {
    let fields: Vec<&str> = metas.iter().flat_map(|meta| meta.fields).copied().collect();
    match metas.first().map(|meta| meta.mode) {
        Some(SelectMode::Select) | None => fields.join(" "),
        Some(SelectMode::Deselect) => fields
            .iter()
            .map(|field| format!("-{field}"))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Remove every deselected field from a serialized record. Used to build
/// JWT claim sets from user rows without the password or audit columns.
pub fn strip_fields(mut record: Value, metas: &[&SelectMeta]) -> Value {
    if let Value::Object(ref mut map) = record {
        for meta in metas {
            if meta.mode == SelectMode::Deselect {
                for field in meta.fields {
                    map.remove(*field);
                }
            }
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deselect_renders_dash_prefixed_fields() {
        let meta = SelectMeta {
            mode: SelectMode::Deselect,
            fields: &["a", "b"],
        };
        assert_eq!(select_string(&[&meta]), "-a -b");
    }

    #[test]
    fn select_renders_space_joined_fields() {
        let meta = SelectMeta {
            mode: SelectMode::Select,
            fields: &["a", "b"],
        };
        assert_eq!(select_string(&[&meta]), "a b");
    }

    #[test]
    fn groups_concatenate_in_order_keeping_duplicates() {
        let first = SelectMeta {
            mode: SelectMode::Deselect,
            fields: &["a", "b"],
        };
        let second = SelectMeta {
            mode: SelectMode::Deselect,
            fields: &["b", "c"],
        };
        assert_eq!(select_string(&[&first, &second]), "-a -b -b -c");
    }

    #[test]
    fn user_projection_hides_password_and_audit_columns() {
        let projection = select_string(&[&DEFAULT_DESELECT, &USER_DESELECT]);
        assert_eq!(
            projection,
            "-created_by -created_at -updated_by -updated_at -password"
        );
    }

    #[test]
    fn strip_fields_removes_deselected_keys() {
        let record = json!({
            "id": "u1",
            "email": "a@b.c",
            "password": "cipher",
            "created_by": "system",
        });
        let cleaned = strip_fields(record, &[&DEFAULT_DESELECT, &USER_DESELECT]);
        assert_eq!(cleaned, json!({"id": "u1", "email": "a@b.c"}));
    }

    #[test]
    fn strip_fields_leaves_non_objects_alone() {
        let cleaned = strip_fields(json!("scalar"), &[&USER_DESELECT]);
        assert_eq!(cleaned, json!("scalar"));
    }
}
