//! Query value objects accepted by the report engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the resolved value should be paged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Page over the elements of a sequence.
    Array,
    /// Page over the entries of a mapping.
    Object,
    /// Infer from the resolved value.
    #[default]
    Auto,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Array => "array",
            PageKind::Object => "object",
            PageKind::Auto => "auto",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Equality filter applied to the elements of an array page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereFilter {
    /// Field to compare; may be a nested dot-path inside each element.
    pub field: String,
    /// Value the field must equal.
    pub equals: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
}

impl WhereFilter {
    pub fn new(field: impl Into<String>, equals: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
            case_insensitive: None,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = Some(false);
        self
    }

    /// Filters compare case-insensitively unless told otherwise.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive.unwrap_or(true)
    }

    /// Returns true if `candidate` matches the expected value.
    ///
    /// Numbers compare numerically. A string compared with a scalar compares
    /// against the scalar's textual rendering, so `"42"` matches `42`.
    pub fn matches(&self, candidate: &Value) -> bool {
        match (&self.equals, candidate) {
            (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
            (Value::String(a), Value::String(b)) => self.text_eq(a, b),
            (Value::String(a), other) | (other, Value::String(a)) if is_scalar(other) => {
                self.text_eq(a, &other.to_string())
            }
            (a, b) => a == b,
        }
    }

    fn text_eq(&self, a: &str, b: &str) -> bool {
        if self.is_case_insensitive() {
            a.to_lowercase() == b.to_lowercase()
        } else {
            a == b
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::Null)
}

/// A navigation request against the report document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_kind: Option<PageKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<WhereFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

impl ReportQuery {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_page_kind(mut self, kind: PageKind) -> Self {
        self.page_kind = Some(kind);
        self
    }

    pub fn with_select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filter(mut self, filter: WhereFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    /// Returns the explicitly requested page kind, treating `auto` as none.
    pub fn explicit_page_kind(&self) -> Option<PageKind> {
        self.page_kind.filter(|kind| *kind != PageKind::Auto)
    }

    /// True when the caller asked for paging rather than a plain value.
    pub fn requests_paging(&self) -> bool {
        self.limit.is_some() || self.cursor.is_some() || self.explicit_page_kind().is_some()
    }

    /// Returns the projection, treating an empty list as no projection.
    pub fn projection(&self) -> Option<&[String]> {
        self.select.as_deref().filter(|fields| !fields.is_empty())
    }
}
