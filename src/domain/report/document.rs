//! The immutable crash report a session navigates.

use std::sync::Arc;

use serde_json::Value;

/// Read-only report document, cheap to clone and share across a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    root: Arc<Value>,
}

impl ReportDocument {
    pub fn new(root: Value) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(Self::new)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }
}

impl From<Value> for ReportDocument {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
