//! Dynamic SQL assembly for the repositories.
//!
//! Identifiers are validated and quoted before interpolation; every value
//! travels as a bound parameter. Rows come back as JSON objects built by
//! Postgres (`row_to_json` / `to_jsonb`), which keeps projected results
//! uniform regardless of which columns a query selects.

use serde_json::Value;
use sqlx::postgres::PgArguments;
use uuid::Uuid;

use super::DatabaseError;

/// Resolve a projection string against an entity's full column list.
///
/// An inclusion string (`"a b"`) selects exactly the listed columns; an
/// exclusion string (`"-a -b"`) selects everything else. An empty string
/// selects all columns. Mixing modes in one string is a caller error and
/// resolves as whatever the first token's mode implies.
pub fn projected_columns(
    projection: &str,
    all_columns: &'static [&'static str],
) -> Vec<&'static str> {
    let tokens: Vec<&str> = projection.split_whitespace().collect();
    match tokens.first() {
        None => all_columns.to_vec(),
        Some(first) if first.starts_with('-') => {
            let excluded: Vec<&str> = tokens
                .iter()
                .filter_map(|t| t.strip_prefix('-'))
                .collect();
            all_columns
                .iter()
                .filter(|column| !excluded.contains(*column))
                .copied()
                .collect()
        }
        Some(_) => all_columns
            .iter()
            .filter(|column| tokens.contains(*column))
            .copied()
            .collect(),
    }
}

/// Reject anything that is not a plain snake_case identifier.
pub fn validate_identifier(name: &str) -> Result<(), DatabaseError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let valid_rest = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if name.is_empty() || !valid_start || !valid_rest {
        return Err(DatabaseError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

fn quote(name: &str) -> String {
    format!("\"{name}\"")
}

/// `SELECT row_to_json(t) AS row FROM (SELECT <cols> FROM "<table>"
/// [WHERE ...]) t`, with one positional parameter per filter key.
pub fn select_json_sql(
    table: &str,
    columns: &[&str],
    filter_keys: &[&str],
) -> Result<String, DatabaseError> {
    validate_identifier(table)?;
    for column in columns.iter().chain(filter_keys) {
        validate_identifier(column)?;
    }

    let select_clause = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ")
    };

    let where_clause = if filter_keys.is_empty() {
        String::new()
    } else {
        let predicates: Vec<String> = filter_keys
            .iter()
            .enumerate()
            .map(|(i, key)| format!("{} = ${}", quote(key), i + 1))
            .collect();
        format!(" WHERE {}", predicates.join(" AND "))
    };

    Ok(format!(
        "SELECT row_to_json(t) AS row FROM (SELECT {select_clause} FROM {}{where_clause}) t",
        quote(table)
    ))
}

/// Dynamic INSERT returning the created row as JSON, optionally with one
/// column (the password) stripped from the returned object. `created_by`
/// is always appended as the final parameter.
pub fn insert_json_sql(
    table: &str,
    columns: &[String],
    strip_from_returning: Option<&str>,
) -> Result<String, DatabaseError> {
    validate_identifier(table)?;
    for column in columns {
        validate_identifier(column)?;
    }

    let mut names: Vec<String> = columns.iter().map(|c| quote(c)).collect();
    names.push(quote("created_by"));
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("${i}")).collect();

    let returning = match strip_from_returning {
        Some(column) => format!("to_jsonb({}) - '{}'", quote(table), column),
        None => format!("to_jsonb({})", quote(table)),
    };

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {returning} AS row",
        quote(table),
        names.join(", "),
        placeholders.join(", ")
    ))
}

/// Dynamic partial UPDATE stamping `updated_by` and `updated_at`. The id is
/// the final parameter. No existence check: zero matched rows is not an
/// error at this layer.
pub fn update_sql(table: &str, columns: &[String]) -> Result<String, DatabaseError> {
    validate_identifier(table)?;
    for column in columns {
        validate_identifier(column)?;
    }

    let mut assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", quote(column), i + 1))
        .collect();
    let actor_param = columns.len() + 1;
    assignments.push(format!("{} = ${actor_param}", quote("updated_by")));
    assignments.push(format!("{} = now()", quote("updated_at")));

    Ok(format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quote(table),
        assignments.join(", "),
        quote("id"),
        actor_param + 1
    ))
}

/// Bind a column value, parsing uuid columns first so the parameter type
/// matches the column type. A JSON string always binds as TEXT otherwise,
/// which Postgres will not compare against or assign into a uuid column.
pub fn bind_column<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    column: &str,
    v: &'q Value,
    uuid_columns: &[&str],
) -> Result<sqlx::query::Query<'q, sqlx::Postgres, PgArguments>, DatabaseError> {
    if !uuid_columns.contains(&column) {
        return Ok(bind_value(q, v));
    }
    match v {
        Value::Null => Ok(q.bind(None::<Uuid>)),
        Value::String(s) => {
            let id = Uuid::parse_str(s)
                .map_err(|_| DatabaseError::InvalidUuid(column.to_string()))?;
            Ok(q.bind(id))
        }
        _ => Err(DatabaseError::InvalidUuid(column.to_string())),
    }
}

/// Bind one query-string filter value, parsing uuid columns like
/// [`bind_column`] does.
pub fn bind_filter<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    key: &str,
    value: &'q str,
    uuid_columns: &[&str],
) -> Result<sqlx::query::Query<'q, sqlx::Postgres, PgArguments>, DatabaseError> {
    if uuid_columns.contains(&key) {
        let id =
            Uuid::parse_str(value).map_err(|_| DatabaseError::InvalidUuid(key.to_string()))?;
        Ok(q.bind(id))
    } else {
        Ok(q.bind(value))
    }
}

/// Bind a JSON value with its natural Postgres type.
fn bind_value<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Arrays and objects bind as JSONB
        other => q.bind(other.clone()),
    }
}
