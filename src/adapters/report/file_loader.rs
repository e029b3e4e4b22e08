//! File-based Report Loader
//!
//! Reads a structured crash report from disk. `.json` files are parsed as
//! JSON; `.yaml` and `.yml` files as YAML. Any other extension is tried as
//! JSON.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::domain::report::ReportDocument;

/// Errors loading a report file.
#[derive(Debug, Error)]
pub enum ReportLoadError {
    #[error("failed to read report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse report {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Loads report documents from a directory.
#[derive(Debug, Clone)]
pub struct FileReportLoader {
    base_path: PathBuf,
}

impl FileReportLoader {
    /// Creates a loader resolving relative paths against `base_path`.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Reads and parses the report at `path`.
    pub async fn load<P: AsRef<Path>>(&self, path: P) -> Result<ReportDocument, ReportLoadError> {
        let path = self.resolve(path.as_ref());
        let raw = fs::read_to_string(&path)
            .await
            .map_err(|source| ReportLoadError::Io {
                path: path.clone(),
                source,
            })?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );

        let root: serde_json::Value = if is_yaml {
            serde_yaml::from_str(&raw).map_err(|e| ReportLoadError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(&raw).map_err(|e| ReportLoadError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?
        };

        tracing::debug!(path = %path.display(), "Loaded report document");
        Ok(ReportDocument::new(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn loads_json_report() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("report.json"),
            r#"{"summary":{"crashType":"AccessViolation"}}"#,
        )
        .unwrap();

        let loader = FileReportLoader::new(dir.path());
        let doc = loader.load("report.json").await.unwrap();
        assert_eq!(doc.root()["summary"]["crashType"], "AccessViolation");
    }

    #[tokio::test]
    async fn loads_yaml_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.yaml");
        std::fs::write(&path, "analysis:\n  threads:\n    all:\n      - threadId: 1\n").unwrap();

        let loader = FileReportLoader::new("/unused");
        let doc = loader.load(&path).await.unwrap();
        assert_eq!(doc.root()["analysis"]["threads"]["all"][0]["threadId"], 1);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let loader = FileReportLoader::new(dir.path());
        let err = loader.load("absent.json").await.unwrap_err();
        assert!(matches!(err, ReportLoadError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let loader = FileReportLoader::new(dir.path());
        let err = loader.load("bad.json").await.unwrap_err();
        assert!(matches!(err, ReportLoadError::Parse { .. }));
    }
}
