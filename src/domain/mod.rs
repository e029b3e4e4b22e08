//! Domain layer containing analysis logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, error codes, modes)
//! - `report` - Dot-path query engine over the crash report
//! - `analysis` - Evidence ledger, hypothesis tracker, session aggregate
//! - `tools` - Tool catalog, calls, results and audit records

pub mod analysis;
pub mod foundation;
pub mod report;
pub mod tools;
