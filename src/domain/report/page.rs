//! The page returned for a report query.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a resolved report query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    /// Canonical path that was resolved.
    pub path: String,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// True when the size guard shrank the page below the requested limit.
    #[serde(default)]
    pub truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_sub_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl ReportPage {
    /// A page holding a single unpaged value.
    pub fn value(path: impl Into<String>, data: Value) -> Self {
        Self {
            path: path.into(),
            data,
            next_cursor: None,
            truncated: false,
            suggested_sub_paths: None,
            offset: None,
            returned: None,
            total: None,
        }
    }

    /// Returns true if more elements remain after this page.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Number of characters in the serialized page.
    pub fn serialized_chars(&self) -> usize {
        serde_json::to_string(self)
            .map(|s| s.chars().count())
            .unwrap_or(usize::MAX)
    }
}
