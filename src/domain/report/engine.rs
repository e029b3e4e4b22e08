//! Report query engine.
//!
//! Resolves a [`ReportQuery`] against a [`ReportDocument`] in five steps:
//! path resolution, page-kind decision, filtering, projection and paging.
//! The serialized page never exceeds the effective `maxChars`; when even a
//! single element does not fit, the caller gets [`ReportError::TooLarge`]
//! with narrower paths to try.

use serde_json::{Map, Value};

use super::{
    DotPath, PageCursor, PageKind, QueryFingerprint, ReportDocument, ReportError, ReportPage,
    ReportQuery, WhereFilter,
};

/// Maximum number of sub-path suggestions attached to a `TooLarge` error.
const MAX_ERROR_SUGGESTIONS: usize = 50;

/// Maximum number of sub-path hints attached to a truncated page.
const MAX_PAGE_HINTS: usize = 20;

/// Paging and size limits applied when a query leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub default_limit: u32,
    pub max_limit: u32,
    pub default_max_chars: usize,
    pub hard_max_chars: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 200,
            default_max_chars: 20_000,
            hard_max_chars: 100_000,
        }
    }
}

/// Stateless resolver for report queries.
#[derive(Debug, Clone, Default)]
pub struct ReportQueryEngine {
    limits: QueryLimits,
}

/// What the resolved value is paged as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Array,
    Object,
    Scalar,
}

/// One pageable element with its own address in the document.
struct Entry {
    address: String,
    key: Option<String>,
    value: Value,
}

impl ReportQueryEngine {
    pub fn new(limits: QueryLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    /// Resolves `query` against `document`.
    pub fn resolve(
        &self,
        document: &ReportDocument,
        query: &ReportQuery,
    ) -> Result<ReportPage, ReportError> {
        let path = DotPath::parse(&query.path)?;
        let value = path.resolve(document.root())?;
        let max_chars = self.effective_max_chars(query);

        let shape = decide_shape(&path, value, query)?;
        if shape == Shape::Scalar {
            return resolve_scalar(&path, value, query, max_chars);
        }

        let kind = match shape {
            Shape::Array => PageKind::Array,
            _ => PageKind::Object,
        };
        let projection = query.projection();
        let entries = match value {
            Value::Array(items) => array_entries(&path, items, query.filter.as_ref(), projection)?,
            Value::Object(map) => {
                if let Some(filter) = &query.filter {
                    return Err(ReportError::invalid_filter(
                        &filter.field,
                        "'where' applies only to array pages",
                    ));
                }
                object_entries(&path, map, projection)
            }
            _ => Vec::new(),
        };

        let fingerprint =
            QueryFingerprint::compute(path.as_str(), kind, query.filter.as_ref(), projection);
        let total = entries.len();
        let offset = match &query.cursor {
            Some(token) => {
                let cursor = PageCursor::decode(token, fingerprint)?;
                if cursor.offset > total {
                    return Err(ReportError::InvalidCursor(format!(
                        "cursor offset {} is past the end ({} elements)",
                        cursor.offset, total
                    )));
                }
                cursor.offset
            }
            None => 0,
        };

        let requested = self.effective_limit(query);
        let wanted_end = offset.saturating_add(requested).min(total);
        let mut count = wanted_end - offset;

        loop {
            let end = offset + count;
            let mut page =
                build_page(&path, shape, &entries[offset..end], offset, total, fingerprint);
            if page.serialized_chars() <= max_chars {
                if end < wanted_end {
                    page.truncated = true;
                    attach_hints(&mut page, &entries[offset..end], max_chars);
                }
                return Ok(page);
            }
            if count <= 1 {
                let (address, suggestions) = match entries.get(offset) {
                    Some(entry) if count == 1 => (
                        entry.address.clone(),
                        child_paths(&entry.address, &entry.value, MAX_ERROR_SUGGESTIONS),
                    ),
                    _ => (path.as_str().to_string(), Vec::new()),
                };
                return Err(ReportError::TooLarge {
                    path: address,
                    max_chars,
                    suggested_sub_paths: suggestions,
                });
            }
            count = (count / 2).max(1);
        }
    }

    fn effective_limit(&self, query: &ReportQuery) -> usize {
        let max = self.limits.max_limit.max(1);
        query
            .limit
            .unwrap_or(self.limits.default_limit)
            .clamp(1, max) as usize
    }

    fn effective_max_chars(&self, query: &ReportQuery) -> usize {
        query
            .max_chars
            .unwrap_or(self.limits.default_max_chars)
            .min(self.limits.hard_max_chars)
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

fn decide_shape(path: &DotPath, value: &Value, query: &ReportQuery) -> Result<Shape, ReportError> {
    let natural = match value {
        Value::Array(_) => Shape::Array,
        Value::Object(_) => Shape::Object,
        _ => Shape::Scalar,
    };
    match (query.explicit_page_kind(), natural) {
        (Some(_), Shape::Scalar) => Err(ReportError::NotPageable {
            path: path.as_str().to_string(),
            actual: shape_name(value),
        }),
        (Some(PageKind::Array), Shape::Object) | (Some(PageKind::Object), Shape::Array) => {
            Err(ReportError::PageKindMismatch {
                path: path.as_str().to_string(),
                requested: query.page_kind.unwrap_or_default(),
                actual: shape_name(value),
            })
        }
        _ => Ok(natural),
    }
}

fn resolve_scalar(
    path: &DotPath,
    value: &Value,
    query: &ReportQuery,
    max_chars: usize,
) -> Result<ReportPage, ReportError> {
    if query.requests_paging() {
        return Err(ReportError::NotPageable {
            path: path.as_str().to_string(),
            actual: shape_name(value),
        });
    }
    if let Some(filter) = &query.filter {
        return Err(ReportError::invalid_filter(
            &filter.field,
            format!("'where' applies only to array pages, found a {}", shape_name(value)),
        ));
    }
    let page = ReportPage::value(path.as_str(), value.clone());
    if page.serialized_chars() > max_chars {
        return Err(ReportError::TooLarge {
            path: path.as_str().to_string(),
            max_chars,
            suggested_sub_paths: Vec::new(),
        });
    }
    Ok(page)
}

fn array_entries(
    path: &DotPath,
    items: &[Value],
    filter: Option<&WhereFilter>,
    projection: Option<&[String]>,
) -> Result<Vec<Entry>, ReportError> {
    let field = match filter {
        Some(filter) => {
            let field = DotPath::parse(&filter.field).map_err(|e| {
                ReportError::invalid_filter(&filter.field, format!("bad field path: {}", e))
            })?;
            if field.is_root() {
                return Err(ReportError::invalid_filter(&filter.field, "field is empty"));
            }
            if !items.is_empty() && !items.iter().any(|item| field.try_resolve(item).is_ok()) {
                return Err(ReportError::invalid_filter(
                    &filter.field,
                    "no element has this field",
                ));
            }
            Some((field, filter))
        }
        None => None,
    };

    Ok(items
        .iter()
        .enumerate()
        .filter(|(_, item)| match &field {
            Some((field, filter)) => field
                .try_resolve(item)
                .map(|candidate| filter.matches(candidate))
                .unwrap_or(false),
            None => true,
        })
        .map(|(index, item)| Entry {
            address: path.child_index(index),
            key: None,
            value: project(item, projection),
        })
        .collect())
}

fn object_entries(
    path: &DotPath,
    map: &Map<String, Value>,
    projection: Option<&[String]>,
) -> Vec<Entry> {
    map.iter()
        .filter(|(key, _)| projection.map_or(true, |fields| fields.iter().any(|f| f == *key)))
        .map(|(key, value)| Entry {
            address: path.child_key(key),
            key: Some(key.clone()),
            value: value.clone(),
        })
        .collect()
}

/// Keeps only the selected fields of an object; other values pass through.
fn project(item: &Value, projection: Option<&[String]>) -> Value {
    match (item, projection) {
        (Value::Object(map), Some(fields)) => {
            let mut projected = Map::new();
            for field in fields {
                if let Some(value) = map.get(field) {
                    projected.insert(field.clone(), value.clone());
                }
            }
            Value::Object(projected)
        }
        _ => item.clone(),
    }
}

fn build_page(
    path: &DotPath,
    shape: Shape,
    entries: &[Entry],
    offset: usize,
    total: usize,
    fingerprint: QueryFingerprint,
) -> ReportPage {
    let data = match shape {
        Shape::Object => Value::Object(
            entries
                .iter()
                .filter_map(|e| e.key.clone().map(|k| (k, e.value.clone())))
                .collect(),
        ),
        _ => Value::Array(entries.iter().map(|e| e.value.clone()).collect()),
    };
    let end = offset + entries.len();
    ReportPage {
        path: path.as_str().to_string(),
        data,
        next_cursor: (end < total).then(|| PageCursor::new(end, fingerprint).encode()),
        truncated: false,
        suggested_sub_paths: None,
        offset: Some(offset),
        returned: Some(entries.len()),
        total: Some(total),
    }
}

/// Adds drill-down hints to a truncated page if they still fit the budget.
fn attach_hints(page: &mut ReportPage, entries: &[Entry], max_chars: usize) {
    let Some(first) = entries.first() else {
        return;
    };
    let hints = child_paths(&first.address, &first.value, MAX_PAGE_HINTS);
    if hints.is_empty() {
        return;
    }
    page.suggested_sub_paths = Some(hints);
    if page.serialized_chars() > max_chars {
        page.suggested_sub_paths = None;
    }
}

fn child_paths(address: &str, value: &Value, cap: usize) -> Vec<String> {
    match value {
        Value::Object(map) => map
            .keys()
            .filter(|key| DotPath::is_addressable_key(key))
            .take(cap)
            .map(|key| {
                if address.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", address, key)
                }
            })
            .collect(),
        Value::Array(items) => (0..items.len().min(cap))
            .map(|i| format!("{}[{}]", address, i))
            .collect(),
        _ => Vec::new(),
    }
}
