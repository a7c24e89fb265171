//! Schema validation for merged config mappings.

use crate::schema::{ConfigSchema, FieldKind, FieldSpec, UnknownFields};
use crate::{FieldErrorKind, ValidationErrors};
use serde_json::{Map, Value};

/// Validate an object against its schema, filling defaults.
///
/// Errors are appended to `errors`; the returned map is only meaningful
/// when none were added.
pub(crate) fn validate_object(
    schema: &ConfigSchema,
    mut map: Map<String, Value>,
    path: &str,
    errors: &mut ValidationErrors,
) -> Map<String, Value> {
    if schema.unknown_fields == UnknownFields::Forbid {
        for key in map.keys() {
            if schema.get(key).is_none() {
                errors.push(join_path(path, key), FieldErrorKind::Unknown);
            }
        }
    }

    for (name, spec) in &schema.fields {
        let field_path = join_path(path, name);
        match map.remove(name) {
            Some(value) => {
                let value = validate_field(spec, value, &field_path, errors);
                map.insert(name.clone(), value);
            }
            None => {
                if let Some(default) = &spec.default {
                    map.insert(name.clone(), default.clone());
                } else if spec.required {
                    errors.push(field_path, FieldErrorKind::Missing);
                }
            }
        }
    }

    map
}

/// Validate a present field value.
fn validate_field(
    spec: &FieldSpec,
    value: Value,
    path: &str,
    errors: &mut ValidationErrors,
) -> Value {
    if value.is_null() && (spec.nullable || matches!(spec.kind, FieldKind::Any)) {
        return value;
    }
    validate_kind(&spec.kind, value, path, errors)
}

/// Check a value against a kind, recursing into containers.
fn validate_kind(kind: &FieldKind, value: Value, path: &str, errors: &mut ValidationErrors) -> Value {
    match (kind, value) {
        (FieldKind::Any, value) => value,
        (FieldKind::Bool, value @ Value::Bool(_)) => value,
        (FieldKind::Integer, Value::Number(number)) if number.is_i64() || number.is_u64() => {
            Value::Number(number)
        }
        (FieldKind::Number, value @ Value::Number(_)) => value,
        (FieldKind::String, value @ Value::String(_)) => value,
        (FieldKind::List(item), Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(idx, entry)| validate_kind(item, entry, &format!("{path}[{idx}]"), errors))
                .collect(),
        ),
        (FieldKind::Map(item), Value::Object(entries)) => Value::Object(
            entries
                .into_iter()
                .map(|(key, entry)| {
                    let entry = validate_kind(item, entry, &join_path(path, &key), errors);
                    (key, entry)
                })
                .collect(),
        ),
        (FieldKind::Object(schema), Value::Object(map)) => {
            Value::Object(validate_object(schema, map, path, errors))
        }
        (kind, value) => {
            errors.push(
                normalize_path(path),
                FieldErrorKind::WrongType {
                    expected: kind.describe(),
                    found: value_kind(&value),
                },
            );
            value
        }
    }
}

/// Name of a JSON value's type for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.to_string()
    }
}
