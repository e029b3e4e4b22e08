//! Report module - Structured navigation of the crash report.
//!
//! The report document is immutable for the lifetime of a session. Queries
//! address nodes by dot-path and return bounded pages that fit a
//! caller-chosen character budget.

mod cursor;
mod document;
mod engine;
mod errors;
mod page;
mod path;
mod query;

pub use cursor::{PageCursor, QueryFingerprint};
pub use document::ReportDocument;
pub use engine::{QueryLimits, ReportQueryEngine};
pub use errors::ReportError;
pub use page::ReportPage;
pub use path::{DotPath, PathSegment};
pub use query::{PageKind, ReportQuery, WhereFilter};
