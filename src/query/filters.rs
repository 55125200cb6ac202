use std::collections::BTreeMap;

/// Record status values stored in the `rec_status` column.
pub mod record_status {
    pub const ACTIVE: &str = "active";
    pub const INACTIVE: &str = "inactive";
    /// Query sentinel meaning "do not filter by record status".
    pub const ALL: &str = "all";
}

const STATUS_KEY: &str = "status";
const REC_STATUS_KEY: &str = "rec_status";

/// One client-facing query key and the database column it maps to.
#[derive(Debug, Clone, Copy)]
pub struct FilterRule {
    pub query_key: &'static str,
    pub db_key: &'static str,
}

/// Remap rules for user list queries.
pub const USER_FILTER_RULES: &[FilterRule] = &[FilterRule {
    query_key: "type",
    db_key: "user_type",
}];

/// Remap rules for institute list queries.
pub const INSTITUTE_FILTER_RULES: &[FilterRule] = &[FilterRule {
    query_key: "admin",
    db_key: "admin_id",
}];

/// Rewrite client query parameters into database column filters, in place.
///
/// The `status` key gets special handling: the sentinel `all` drops the
/// record-status predicate entirely, any other value moves to `rec_status`,
/// and an absent key injects the default `rec_status = active`. Every remap
/// rule then moves its query key to the matching column key. Afterwards the
/// map contains only column names; callers must not reuse the original keys.
pub fn apply_filters(filters: &mut BTreeMap<String, String>, rules: &[FilterRule]) {
    match filters.remove(STATUS_KEY) {
        Some(status) if status == record_status::ALL => {}
        Some(status) => {
            filters.insert(REC_STATUS_KEY.to_string(), status);
        }
        None => {
            filters.insert(
                REC_STATUS_KEY.to_string(),
                record_status::ACTIVE.to_string(),
            );
        }
    }

    for rule in rules {
        if let Some(value) = filters.remove(rule.query_key) {
            filters.insert(rule.db_key.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_status_injects_active_default() {
        let mut query = filters(&[("gender", "Female")]);
        apply_filters(&mut query, USER_FILTER_RULES);
        assert_eq!(query.get("rec_status").map(String::as_str), Some("active"));
        assert_eq!(query.get("gender").map(String::as_str), Some("Female"));
    }

    #[test]
    fn status_all_removes_predicate_entirely() {
        let mut query = filters(&[("status", "all")]);
        apply_filters(&mut query, USER_FILTER_RULES);
        assert!(!query.contains_key("status"));
        assert!(!query.contains_key("rec_status"));
    }

    #[test]
    fn explicit_status_moves_to_rec_status() {
        let mut query = filters(&[("status", "inactive")]);
        apply_filters(&mut query, USER_FILTER_RULES);
        assert!(!query.contains_key("status"));
        assert_eq!(
            query.get("rec_status").map(String::as_str),
            Some("inactive")
        );
    }

    #[test]
    fn rules_move_query_keys_to_columns() {
        let mut query = filters(&[("type", "admin")]);
        apply_filters(&mut query, USER_FILTER_RULES);
        assert!(!query.contains_key("type"));
        assert_eq!(query.get("user_type").map(String::as_str), Some("admin"));
    }

    #[test]
    fn only_column_keys_remain() {
        let mut query = filters(&[("status", "inactive"), ("type", "admin"), ("gender", "Male")]);
        apply_filters(&mut query, USER_FILTER_RULES);
        let keys: Vec<&str> = query.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["gender", "rec_status", "user_type"]);
    }

    #[test]
    fn institute_rules_remap_admin_reference() {
        let mut query = filters(&[("admin", "2f4d")]);
        apply_filters(&mut query, INSTITUTE_FILTER_RULES);
        assert_eq!(query.get("admin_id").map(String::as_str), Some("2f4d"));
        assert!(!query.contains_key("admin"));
    }
}
