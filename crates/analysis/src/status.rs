//! Analysis job status file.
//!
//! The file holds `{status, result, error, timestamp}` and is rewritten at
//! every state transition so an external poller can follow a running job.

use crate::graph::GraphResult;
use archimind_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lifecycle state of an analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Processing,
    Completed,
    Error,
}

/// Artefacts produced by a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Markdown architecture handbook
    #[serde(rename = "chat_response")]
    pub documentation: String,
    pub hld_graph: GraphResult,
    pub lld_graph: GraphResult,
    pub chat_summary: String,
    pub repo_name: String,
    pub repo_url: String,
}

/// Contents of the status file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: JobState,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    /// Unix seconds of the last terminal transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl JobStatus {
    pub fn processing() -> Self {
        Self {
            status: JobState::Processing,
            result: None,
            error: None,
            timestamp: None,
        }
    }

    pub fn completed(result: AnalysisResult) -> Self {
        Self {
            status: JobState::Completed,
            result: Some(result),
            error: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: JobState::Error,
            result: None,
            error: Some(error.into()),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

/// Reads and writes the status file.
#[derive(Debug, Clone)]
pub struct StatusFile {
    path: PathBuf,
}

impl StatusFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the status file contents.
    ///
    /// Written to a sibling temp file and renamed into place so readers
    /// never observe a partial document.
    pub fn write(&self, status: &JobStatus) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(status)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!("Status {:?} written to {:?}", status.status, self.path);
        Ok(())
    }

    /// Read the current status, or `None` when no job has run yet.
    pub fn read(&self) -> AppResult<Option<JobStatus>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let status = serde_json::from_str(&contents).map_err(|e| {
            AppError::Analysis(format!("Corrupt status file {:?}: {}", self.path, e))
        })?;
        Ok(Some(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            documentation: "# Handbook".to_string(),
            hld_graph: GraphResult::Ok {
                graph: serde_json::json!({"title": "System"}),
            },
            lld_graph: GraphResult::Error {
                message: "No LLD data returned.".to_string(),
                raw_preview: None,
            },
            chat_summary: "Summary".to_string(),
            repo_name: "shop".to_string(),
            repo_url: "https://github.com/acme/shop".to_string(),
        }
    }

    #[test]
    fn test_missing_file_reads_none() {
        let temp = TempDir::new().unwrap();
        let file = StatusFile::new(temp.path().join("status.json"));
        assert!(file.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let file = StatusFile::new(temp.path().join(".archimind/status.json"));

        file.write(&JobStatus::processing()).unwrap();
        assert_eq!(file.read().unwrap().unwrap().status, JobState::Processing);

        let done = JobStatus::completed(sample_result());
        file.write(&done).unwrap();
        assert_eq!(file.read().unwrap().unwrap(), done);
        assert!(!temp.path().join(".archimind/status.json.tmp").exists());
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(JobStatus::completed(sample_result())).unwrap();

        assert_eq!(value["status"], "completed");
        assert_eq!(value["error"], serde_json::Value::Null);
        assert_eq!(value["result"]["chat_response"], "# Handbook");
        assert_eq!(value["result"]["hld_graph"]["status"], "ok");
        assert_eq!(value["result"]["lld_graph"]["status"], "error");
        assert!(value["timestamp"].is_i64());

        let processing = serde_json::to_value(JobStatus::processing()).unwrap();
        assert_eq!(
            processing,
            serde_json::json!({"status": "processing", "result": null, "error": null})
        );
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("status.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            StatusFile::new(path).read(),
            Err(AppError::Analysis(_))
        ));
    }
}
