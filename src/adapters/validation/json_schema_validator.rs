//! JSON Schema Validator - Implementation of ArgumentSchemaValidator.
//!
//! Walks the subset of JSON Schema the tool catalog uses (`type`,
//! `required`, `properties`, `items`, `enum`, `minimum`, `maximum`,
//! `minItems`) without an external schema dependency. Unknown keywords are
//! ignored, as are properties the schema does not describe.

use serde_json::{Map, Value};

use crate::ports::{ArgumentSchemaValidator, SchemaValidationError};

/// Schema-driven argument validator.
///
/// # Thread Safety
///
/// This struct is `Send + Sync` and can be shared across tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    fn check(
        &self,
        schema: &Value,
        value: &Value,
        path: &str,
        errors: &mut Vec<SchemaValidationError>,
    ) {
        let Some(schema) = schema.as_object() else {
            return;
        };

        if let Some(expected) = schema.get("type").and_then(Value::as_str) {
            if !Self::has_type(value, expected) {
                errors.push(SchemaValidationError::InvalidType {
                    field: Self::display_path(path),
                    expected: expected.to_string(),
                    actual: Self::type_name(value),
                });
                return;
            }
        }

        if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                errors.push(SchemaValidationError::NotInEnum {
                    field: Self::display_path(path),
                    allowed: allowed
                        .iter()
                        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }

        match value {
            Value::Number(n) => self.check_range(schema, n.as_f64().unwrap_or(0.0), path, errors),
            Value::Array(items) => self.check_array(schema, items, path, errors),
            Value::Object(obj) => self.check_object(schema, obj, path, errors),
            _ => {}
        }
    }

    fn check_range(
        &self,
        schema: &Map<String, Value>,
        n: f64,
        path: &str,
        errors: &mut Vec<SchemaValidationError>,
    ) {
        let min = schema.get("minimum").and_then(Value::as_f64);
        let max = schema.get("maximum").and_then(Value::as_f64);
        let below = min.is_some_and(|m| n < m);
        let above = max.is_some_and(|m| n > m);
        if below || above {
            errors.push(SchemaValidationError::OutOfRange {
                field: Self::display_path(path),
                value: n.to_string(),
                min: min.map_or_else(|| "-inf".to_string(), |m| m.to_string()),
                max: max.map_or_else(|| "inf".to_string(), |m| m.to_string()),
            });
        }
    }

    fn check_array(
        &self,
        schema: &Map<String, Value>,
        items: &[Value],
        path: &str,
        errors: &mut Vec<SchemaValidationError>,
    ) {
        if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < min {
                errors.push(SchemaValidationError::ArrayTooShort {
                    field: Self::display_path(path),
                    min: min as usize,
                    actual: items.len(),
                });
            }
        }
        if let Some(item_schema) = schema.get("items") {
            for (i, item) in items.iter().enumerate() {
                self.check(item_schema, item, &format!("{}[{}]", path, i), errors);
            }
        }
    }

    fn check_object(
        &self,
        schema: &Map<String, Value>,
        obj: &Map<String, Value>,
        path: &str,
        errors: &mut Vec<SchemaValidationError>,
    ) {
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for field in required.iter().filter_map(Value::as_str) {
                if !obj.contains_key(field) {
                    errors.push(SchemaValidationError::MissingRequired {
                        field: Self::join(path, field),
                    });
                }
            }
        }
        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (name, property_schema) in properties {
                if let Some(value) = obj.get(name) {
                    self.check(property_schema, value, &Self::join(path, name), errors);
                }
            }
        }
    }

    fn has_type(value: &Value, expected: &str) -> bool {
        match expected {
            "object" => value.is_object(),
            "array" => value.is_array(),
            "string" => value.is_string(),
            "boolean" => value.is_boolean(),
            "null" => value.is_null(),
            "number" => value.is_number(),
            // `2.0` does not deserialize into an integer parameter.
            "integer" => value.is_i64() || value.is_u64(),
            _ => true,
        }
    }

    fn type_name(value: &Value) -> String {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
        .to_string()
    }

    fn join(parent: &str, field: &str) -> String {
        if parent.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", parent, field)
        }
    }

    fn display_path(path: &str) -> String {
        if path.is_empty() {
            "arguments".to_string()
        } else {
            path.to_string()
        }
    }
}

impl ArgumentSchemaValidator for JsonSchemaValidator {
    fn validate(&self, schema: &Value, arguments: &Value) -> Result<(), SchemaValidationError> {
        let mut errors = Vec::new();
        self.check(schema, arguments, "", &mut errors);
        match SchemaValidationError::from_all(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
