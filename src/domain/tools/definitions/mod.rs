//! Tool Definitions - Catalog entries and parameter types for every tool.
//!
//! ## Module Structure
//!
//! - [`debugger`] - Tools that reach the debugger backend
//! - [`report`] - Structured report navigation
//! - [`ledger`] - Evidence and hypothesis bookkeeping (root-cause only)
//! - [`completion`] - One completion tool per analysis mode

pub mod completion;
pub mod debugger;
pub mod ledger;
pub mod report;

pub use completion::*;
pub use debugger::*;
pub use ledger::*;
pub use report::*;

/// Canonical tool names.
pub mod names {
    pub const EXEC: &str = "exec";
    pub const REPORT_GET: &str = "report_get";
    pub const INSPECT: &str = "inspect";
    pub const GET_THREAD_STACK: &str = "get_thread_stack";
    pub const ANALYSIS_COMPLETE: &str = "analysis_complete";
    pub const SUMMARY_REWRITE_COMPLETE: &str = "analysis_summary_rewrite_complete";
    pub const THREAD_NARRATIVE_COMPLETE: &str = "analysis_thread_narrative_complete";
    pub const EVIDENCE_ADD: &str = "analysis_evidence_add";
    pub const HYPOTHESIS_REGISTER: &str = "analysis_hypothesis_register";
    pub const HYPOTHESIS_SCORE: &str = "analysis_hypothesis_score";
}
