//! Schema Validator Port - Tool argument validation interface.
//!
//! Every tool call's arguments are checked against the tool's input schema
//! before dispatch. The orchestrator depends on this trait; adapters (like
//! `JsonSchemaValidator`) provide the implementation.

use serde_json::Value;
use thiserror::Error;

/// Port for validating tool arguments against an input schema.
///
/// # Contract
///
/// Implementations must:
/// - Reject arguments that are not JSON objects when the schema is object-typed
/// - Report every missing required property
/// - Check `type`, `enum`, `minimum`/`maximum` and `minItems` where present
/// - Ignore schema keywords they do not understand
///
/// # Usage
///
/// ```rust,ignore
/// let validator: &dyn ArgumentSchemaValidator = &JsonSchemaValidator::new();
/// validator.validate(tool.input_schema(), call.arguments())?;
/// ```
pub trait ArgumentSchemaValidator: Send + Sync {
    /// Validates `arguments` against `schema`.
    ///
    /// Returns `Ok(())` if valid, `Err` listing the violations if not.
    fn validate(&self, schema: &Value, arguments: &Value) -> Result<(), SchemaValidationError>;
}

/// Errors that can occur during argument validation.
///
/// Field names are paths into the arguments, e.g. `items[1].finding`.
#[derive(Debug, Clone, Error)]
pub enum SchemaValidationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Array too short for field {field}: minimum {min}, got {actual}")]
    ArrayTooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("Value out of range for field {field}: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Invalid value for field {field}: expected one of {allowed}")]
    NotInEnum { field: String, allowed: String },

    #[error("Validation errors: {}", format_all(.0))]
    Multiple(Vec<SchemaValidationError>),
}

fn format_all(errors: &[SchemaValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SchemaValidationError {
    /// Collapses a list of violations into one error.
    pub fn from_all(mut errors: Vec<SchemaValidationError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(SchemaValidationError::Multiple(errors)),
        }
    }

    /// Short message for the model, without the actual offending values.
    pub fn to_client_message(&self) -> String {
        match self {
            SchemaValidationError::MissingRequired { field } => {
                format!("Missing required field: {}", field)
            }
            SchemaValidationError::InvalidType { field, expected, .. } => {
                format!("Invalid type for field '{}': expected {}", field, expected)
            }
            SchemaValidationError::ArrayTooShort { field, min, .. } => {
                format!("Field '{}' requires at least {} items", field, min)
            }
            SchemaValidationError::OutOfRange { field, min, max, .. } => {
                format!("Field '{}' must be between {} and {}", field, min, max)
            }
            SchemaValidationError::NotInEnum { field, allowed } => {
                format!("Field '{}' must be one of {}", field, allowed)
            }
            SchemaValidationError::Multiple(errors) => errors
                .iter()
                .map(|e| e.to_client_message())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// Get the count of validation errors.
    pub fn error_count(&self) -> usize {
        match self {
            SchemaValidationError::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }
}

impl PartialEq for SchemaValidationError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_displays_field_name() {
        let err = SchemaValidationError::MissingRequired {
            field: "command".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required field: command");
        assert_eq!(err.to_client_message(), "Missing required field: command");
    }

    #[test]
    fn client_message_for_invalid_type_hides_actual() {
        let err = SchemaValidationError::InvalidType {
            field: "limit".to_string(),
            expected: "integer".to_string(),
            actual: "string".to_string(),
        };
        let msg = err.to_client_message();
        assert!(msg.contains("expected integer"));
        assert!(!msg.contains("got"));
    }

    #[test]
    fn enum_violation_lists_allowed_values() {
        let err = SchemaValidationError::NotInEnum {
            field: "pageKind".to_string(),
            allowed: "array, object, auto".to_string(),
        };
        assert_eq!(
            err.to_client_message(),
            "Field 'pageKind' must be one of array, object, auto"
        );
    }

    #[test]
    fn from_all_collapses_single_error() {
        assert!(SchemaValidationError::from_all(Vec::new()).is_none());

        let single = SchemaValidationError::from_all(vec![SchemaValidationError::MissingRequired {
            field: "path".to_string(),
        }])
        .unwrap();
        assert_eq!(single.error_count(), 1);

        let multiple = SchemaValidationError::from_all(vec![
            SchemaValidationError::MissingRequired { field: "a".to_string() },
            SchemaValidationError::MissingRequired { field: "b".to_string() },
        ])
        .unwrap();
        assert_eq!(multiple.error_count(), 2);
        assert_eq!(
            multiple.to_string(),
            "Validation errors: Missing required field: a; Missing required field: b"
        );
    }
}
