//! Typed pagination cursors.
//!
//! A cursor is an `(offset, fingerprint)` pair. The fingerprint binds it to
//! the query shape that produced it, so a cursor cannot be replayed against a
//! different path, page kind, filter or projection. [`PageCursor::encode`]
//! and [`PageCursor::decode`] are the only places the pair is stringified.

use std::fmt;

use sha2::{Digest, Sha256};

use super::{PageKind, ReportError, WhereFilter};

const CURSOR_PREFIX: &str = "rc1";

/// Truncated SHA-256 digest of a query's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryFingerprint([u8; 8]);

impl QueryFingerprint {
    /// Computes the fingerprint for a query shape.
    ///
    /// `limit` and `maxChars` are not part of the shape; a cursor stays valid
    /// when the page size changes between requests.
    pub fn compute(
        path: &str,
        kind: PageKind,
        filter: Option<&WhereFilter>,
        select: Option<&[String]>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(path.as_bytes());
        hasher.update([0]);
        hasher.update(kind.as_str().as_bytes());
        hasher.update([0]);
        if let Some(filter) = filter {
            hasher.update(filter.field.as_bytes());
            hasher.update([0]);
            hasher.update(filter.equals.to_string().as_bytes());
            hasher.update([u8::from(filter.is_case_insensitive())]);
        }
        hasher.update([0]);
        if let Some(fields) = select {
            for field in fields {
                hasher.update(field.as_bytes());
                hasher.update([0x1f]);
            }
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self(bytes)
    }

    fn to_hex(self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 16 || !hex.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 8];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for QueryFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Position within a paged result, bound to a query shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: usize,
    pub fingerprint: QueryFingerprint,
}

impl PageCursor {
    pub fn new(offset: usize, fingerprint: QueryFingerprint) -> Self {
        Self {
            offset,
            fingerprint,
        }
    }

    /// Renders the cursor as an opaque token.
    pub fn encode(&self) -> String {
        format!("{}.{}.{}", CURSOR_PREFIX, self.offset, self.fingerprint)
    }

    /// Parses a token and checks it belongs to `expected`.
    pub fn decode(token: &str, expected: QueryFingerprint) -> Result<Self, ReportError> {
        let mut parts = token.trim().split('.');
        let (prefix, offset, hash) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(p), Some(o), Some(h), None) => (p, o, h),
            _ => return Err(ReportError::InvalidCursor(format!("malformed cursor '{}'", token))),
        };
        if prefix != CURSOR_PREFIX {
            return Err(ReportError::InvalidCursor(format!(
                "unrecognized cursor '{}'",
                token
            )));
        }
        let offset = offset
            .parse::<usize>()
            .map_err(|_| ReportError::InvalidCursor(format!("bad offset in '{}'", token)))?;
        let fingerprint = QueryFingerprint::from_hex(hash)
            .ok_or_else(|| ReportError::InvalidCursor(format!("bad fingerprint in '{}'", token)))?;
        if fingerprint != expected {
            return Err(ReportError::InvalidCursor(
                "cursor was issued for a different query; restart without a cursor".to_string(),
            ));
        }
        Ok(Self::new(offset, fingerprint))
    }
}
