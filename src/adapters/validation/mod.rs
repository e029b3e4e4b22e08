//! Validation Adapters - Schema validation implementations.
//!
//! Contains the adapter that checks tool arguments against input schemas.

mod json_schema_validator;

pub use json_schema_validator::JsonSchemaValidator;
