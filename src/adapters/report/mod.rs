//! Report Adapters - Loading report documents from storage.

mod file_loader;

pub use file_loader::{FileReportLoader, ReportLoadError};
