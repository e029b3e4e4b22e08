//! Dot-path expressions addressing nodes inside a report document.
//!
//! Grammar: dot-separated keys, each optionally followed by one or more
//! `[index]` suffixes, e.g. `analysis.threads.all[0].frames[2]`. The empty
//! path (or `$`) addresses the document root.

use std::fmt;

use serde_json::Value;

use super::ReportError;

/// One navigation step in a [`DotPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member lookup.
    Key(String),
    /// Array element lookup.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// A parsed dot-path with its canonical textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotPath {
    segments: Vec<PathSegment>,
    canonical: String,
}

impl DotPath {
    /// The path addressing the document root.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
            canonical: String::new(),
        }
    }

    /// Parses a dot-path expression.
    pub fn parse(raw: &str) -> Result<Self, ReportError> {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix("$.")
            .or_else(|| trimmed.strip_prefix('$'))
            .unwrap_or(trimmed);
        if body.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        let mut chars = body.chars().peekable();
        let mut key = String::new();
        // True right after a ']' so that "a[0].b" and "a[0][1]" parse but "a[0]b" does not.
        let mut after_index = false;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if key.is_empty() && !after_index {
                        return Err(ReportError::invalid_path(raw, "empty segment"));
                    }
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    after_index = false;
                    match chars.peek() {
                        None => return Err(ReportError::invalid_path(raw, "trailing '.'")),
                        Some(&'[') => {
                            return Err(ReportError::invalid_path(raw, "expected a key after '.'"))
                        }
                        Some(_) => {}
                    }
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    let mut digits = String::new();
                    let mut closed = false;
                    for d in chars.by_ref() {
                        if d == ']' {
                            closed = true;
                            break;
                        }
                        digits.push(d);
                    }
                    if !closed {
                        return Err(ReportError::invalid_path(raw, "unclosed '['"));
                    }
                    let index = digits.trim().parse::<usize>().map_err(|_| {
                        let reason = format!("'{}' is not an array index", digits);
                        ReportError::invalid_path(raw, reason)
                    })?;
                    segments.push(PathSegment::Index(index));
                    after_index = true;
                }
                ']' => return Err(ReportError::invalid_path(raw, "unexpected ']'")),
                other => {
                    if after_index {
                        return Err(ReportError::invalid_path(
                            raw,
                            "expected '.' or '[' after an index",
                        ));
                    }
                    key.push(other);
                }
            }
        }
        if !key.is_empty() {
            segments.push(PathSegment::Key(key));
        }

        Ok(Self::from_segments(segments))
    }

    /// True if `key` can be written as a path segment.
    ///
    /// Keys holding `.`, `[` or `]`, or surrounding whitespace, cannot be
    /// addressed and are left out of suggestions.
    pub fn is_addressable_key(key: &str) -> bool {
        !key.is_empty() && key.trim() == key && !key.contains(['.', '[', ']'])
    }

    fn from_segments(segments: Vec<PathSegment>) -> Self {
        let mut canonical = String::new();
        for segment in &segments {
            match segment {
                PathSegment::Key(key) => {
                    if !canonical.is_empty() {
                        canonical.push('.');
                    }
                    canonical.push_str(key);
                }
                PathSegment::Index(index) => {
                    canonical.push_str(&format!("[{}]", index));
                }
            }
        }
        Self {
            segments,
            canonical,
        }
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns true if this path addresses the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the canonical textual form.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Returns the path of a member of the addressed object.
    pub fn child_key(&self, key: &str) -> String {
        if self.is_root() {
            key.to_string()
        } else {
            format!("{}.{}", self.canonical, key)
        }
    }

    /// Returns the path of an element of the addressed array.
    pub fn child_index(&self, index: usize) -> String {
        format!("{}[{}]", self.canonical, index)
    }

    /// Walks `value` along this path.
    ///
    /// A numeric key applied to an array is treated as an index, so
    /// `threads.0` and `threads[0]` address the same element.
    pub fn resolve<'a>(&self, value: &'a Value) -> Result<&'a Value, ReportError> {
        self.try_resolve(value).map_err(|segment| ReportError::PathNotFound {
            path: self.canonical.clone(),
            segment: segment.to_string(),
        })
    }

    /// Like [`DotPath::resolve`] but returns the first unresolved segment.
    pub fn try_resolve<'a>(&self, value: &'a Value) -> Result<&'a Value, &PathSegment> {
        let mut current = value;
        for segment in &self.segments {
            let next = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key),
                (PathSegment::Key(key), Value::Array(items)) => {
                    key.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            };
            current = next.ok_or(segment)?;
        }
        Ok(current)
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "$")
        } else {
            write!(f, "{}", self.canonical)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> Value {
        json!({
            "analysis": {
                "threads": {
                    "all": [
                        { "id": "0x1a", "frames": [{ "fn": "main" }, { "fn": "crash" }] },
                        { "id": "0x2b", "frames": [] }
                    ]
                }
            }
        })
    }

    #[test]
    fn parses_keys_and_indices() {
        let path = DotPath::parse("analysis.threads.all[0].frames[1]").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("analysis".into()),
                PathSegment::Key("threads".into()),
                PathSegment::Key("all".into()),
                PathSegment::Index(0),
                PathSegment::Key("frames".into()),
                PathSegment::Index(1),
            ]
        );
        assert_eq!(path.as_str(), "analysis.threads.all[0].frames[1]");
    }

    #[test]
    fn empty_and_dollar_address_root() {
        assert!(DotPath::parse("").unwrap().is_root());
        assert!(DotPath::parse("$").unwrap().is_root());
        assert_eq!(DotPath::parse("$.analysis").unwrap().as_str(), "analysis");
    }

    #[test]
    fn consecutive_indices_parse() {
        let path = DotPath::parse("matrix[1][2]").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.as_str(), "matrix[1][2]");
    }

    #[test]
    fn malformed_paths_are_rejected() {
        for raw in ["a..b", "a.", ".a", "a[", "a[x]", "a]", "a[0]b", "a.[0]"] {
            assert!(
                matches!(DotPath::parse(raw), Err(ReportError::InvalidPath { .. })),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn addressable_keys_exclude_path_syntax() {
        assert!(DotPath::is_addressable_key("threadId"));
        assert!(DotPath::is_addressable_key("0"));
        for key in ["", "a.b", "x[0]", "y]", " padded"] {
            assert!(!DotPath::is_addressable_key(key), "{key:?} should not be addressable");
        }
    }

    #[test]
    fn resolve_walks_nested_values() {
        let doc = report();
        let path = DotPath::parse("analysis.threads.all[0].frames[1].fn").unwrap();
        assert_eq!(path.resolve(&doc).unwrap(), "crash");
    }

    #[test]
    fn numeric_key_indexes_arrays() {
        let doc = report();
        let path = DotPath::parse("analysis.threads.all.1.id").unwrap();
        assert_eq!(path.resolve(&doc).unwrap(), "0x2b");
    }

    #[test]
    fn resolve_reports_first_missing_segment() {
        let doc = report();
        let path = DotPath::parse("analysis.heap.segments").unwrap();
        let err = path.resolve(&doc).unwrap_err();
        assert_eq!(
            err,
            ReportError::PathNotFound {
                path: "analysis.heap.segments".into(),
                segment: "heap".into(),
            }
        );
    }

    #[test]
    fn out_of_bounds_index_is_not_found() {
        let doc = report();
        let path = DotPath::parse("analysis.threads.all[9]").unwrap();
        assert!(matches!(
            path.resolve(&doc),
            Err(ReportError::PathNotFound { segment, .. }) if segment == "[9]"
        ));
    }

    #[test]
    fn child_paths_are_addressable() {
        let root = DotPath::root();
        assert_eq!(root.child_key("analysis"), "analysis");
        let threads = DotPath::parse("analysis.threads.all").unwrap();
        assert_eq!(threads.child_index(3), "analysis.threads.all[3]");
        assert_eq!(threads.child_key("count"), "analysis.threads.all.count");
    }
}
