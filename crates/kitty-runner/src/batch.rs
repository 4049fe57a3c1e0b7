//! Batch runner
//!
//! Cases are independent: a case that fails is reported and the batch moves
//! on. Each report is written to a temporary file and renamed into place, so
//! an interrupted run never leaves a partial artifact behind.

use std::path::{Path, PathBuf};

use kitty_common::{Case, CaseReport, KittyError, Result};
use serde_json::Value;
use tracing::{error, info};

use crate::pipeline::Pipeline;

/// A case that produced no output
#[derive(Debug, Clone, PartialEq)]
pub struct CaseFailure {
    /// 1-based position in the input file
    pub index: usize,
    pub title: String,
    pub reason: String,
}

/// Outcome of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<CaseFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Read the input file as a list of raw cases
///
/// Cases are decoded one by one later so a malformed case only fails itself.
pub async fn load_batch(path: &Path) -> Result<Vec<Value>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| KittyError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    let cases: Vec<Value> = serde_json::from_str(&content)?;
    Ok(cases)
}

/// `case-<n>-<slug>.json`
pub fn case_file_name(index: usize, title: &str) -> String {
    let slug = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .replace(['/', '\\'], "-");
    format!("case-{}-{}.json", index, slug)
}

/// Write a report atomically
pub async fn write_report(dir: &Path, file_name: &str, report: &CaseReport) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let tmp = dir.join(format!(".{}.tmp", file_name));

    let json = serde_json::to_string_pretty(report)?;
    let written = match tokio::fs::write(&tmp, json).await {
        Ok(()) => tokio::fs::rename(&tmp, &path).await,
        Err(err) => Err(err),
    };

    if let Err(err) = written {
        // Best effort; the original error is what the caller needs
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(err.into());
    }
    Ok(path)
}

/// Runs every case of a batch through the pipeline
pub struct BatchRunner<'a> {
    pipeline: Pipeline<'a>,
    output_dir: PathBuf,
}

impl<'a> BatchRunner<'a> {
    pub fn new(pipeline: Pipeline<'a>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            output_dir: output_dir.into(),
        }
    }

    /// Process cases in order
    ///
    /// Only failing to create the output directory aborts the batch.
    pub async fn run(&self, cases: &[Value]) -> Result<BatchReport> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut report = BatchReport::default();
        for (i, raw) in cases.iter().enumerate() {
            let index = i + 1;
            let title = raw
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("untitled")
                .to_string();

            match self.run_one(index, raw).await {
                Ok(path) => {
                    info!("{} => written to {}", title, path.display());
                    report.written.push(path);
                }
                Err(err) => {
                    error!(case = index, %title, error = %err, "Case failed");
                    report.failures.push(CaseFailure {
                        index,
                        title,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    async fn run_one(&self, index: usize, raw: &Value) -> Result<PathBuf> {
        let case: Case = serde_json::from_value(raw.clone())?;
        let outcome = self.pipeline.run_case(&case).await?;
        let file_name = case_file_name(index, &case.title);
        write_report(&self.output_dir, &file_name, &outcome.report).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_file_name() {
        assert_eq!(case_file_name(1, "North Region Q3"), "case-1-north-region-q3.json");
        assert_eq!(case_file_name(12, "Tabs\tand   spaces"), "case-12-tabs-and-spaces.json");
        assert_eq!(case_file_name(2, "EU/West"), "case-2-eu-west.json");
        assert_eq!(case_file_name(1, " North  Region "), "case-1-north-region.json");
    }

    fn empty_report() -> CaseReport {
        CaseReport {
            title: "North".to_string(),
            allocations: vec![],
        }
    }

    fn leftover_tmp_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "tmp"))
            .collect()
    }

    #[tokio::test]
    async fn test_write_report_replaces_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "case-1-north.json", &empty_report())
            .await
            .unwrap();

        let written: CaseReport = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.title, "North");
        assert!(written.allocations.is_empty());
        assert!(leftover_tmp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target path makes the rename fail
        let blocked = dir.path().join("case-1-north.json");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), "x").unwrap();

        let result = write_report(dir.path(), "case-1-north.json", &empty_report()).await;
        assert!(result.is_err());
        assert!(leftover_tmp_files(dir.path()).is_empty());
    }

    #[test]
    fn test_batch_report_counts() {
        let report = BatchReport {
            written: vec![PathBuf::from("a.json")],
            failures: vec![CaseFailure {
                index: 2,
                title: "B".to_string(),
                reason: "Case has no sales agents".to_string(),
            }],
        };
        assert_eq!(report.total(), 2);
        assert!(!report.is_success());
    }
}
