//! Meshforge Blender execution service
//!
//! Runs generated Blender Python scripts via the headless CLI
//! (`blender -b -P script.py`):
//! - `HeadlessBlender`: real subprocess backend with a hard timeout
//! - `MockBlender`: programmable mock for testing job workflows

pub mod mock;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum BlenderError {
    #[error("Blender not found at '{0}'")]
    NotFound(String),

    #[error("Blender execution timed out after {0}s")]
    Timeout(u64),

    #[error("Blender spawn error: {0}")]
    Spawn(#[from] std::io::Error),
}

/// How many trailing characters of stdout/stderr are kept on a run report.
const LOG_TAIL_CHARS: usize = 2000;

/// Outcome of a single headless Blender run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub returncode: i32,
    pub stdout_tail: Option<String>,
    pub stderr_tail: Option<String>,
}

impl RunReport {
    pub fn success(&self) -> bool {
        self.returncode == 0
    }
}

/// Keep the last `LOG_TAIL_CHARS` characters of captured process output.
pub fn log_tail(output: &str) -> Option<String> {
    if output.is_empty() {
        return None;
    }
    let start = output
        .char_indices()
        .rev()
        .nth(LOG_TAIL_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    Some(output[start..].to_string())
}

/// Blender execution backend.
///
/// Runs a Python script in the given working directory; output files
/// (STL export, render PNG) land next to the script, resolved by the
/// caller after the run.
#[async_trait::async_trait]
pub trait BlenderRunner: Send + Sync {
    async fn run_script(&self, script_path: &Path, workdir: &Path)
        -> Result<RunReport, BlenderError>;
}

/// Real backend: spawns the Blender binary headless with a hard timeout.
pub struct HeadlessBlender {
    blender_path: PathBuf,
    timeout: Duration,
}

impl HeadlessBlender {
    pub fn new(blender_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            blender_path: blender_path.into(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl BlenderRunner for HeadlessBlender {
    async fn run_script(
        &self,
        script_path: &Path,
        workdir: &Path,
    ) -> Result<RunReport, BlenderError> {
        tracing::info!(
            blender = %self.blender_path.display(),
            script = %script_path.display(),
            "Starting headless Blender run"
        );

        let child = Command::new(&self.blender_path)
            .arg("-b")
            .arg("-P")
            .arg(script_path)
            .current_dir(workdir)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(result) => result.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BlenderError::NotFound(self.blender_path.to_string_lossy().into_owned())
                } else {
                    BlenderError::Spawn(e)
                }
            })?,
            Err(_) => return Err(BlenderError::Timeout(self.timeout.as_secs())),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let returncode = output.status.code().unwrap_or(-1);

        tracing::info!(returncode, "Headless Blender run finished");

        Ok(RunReport {
            returncode,
            stdout_tail: log_tail(&stdout),
            stderr_tail: log_tail(&stderr),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tail_short_output() {
        assert_eq!(log_tail("hello"), Some("hello".to_string()));
        assert_eq!(log_tail(""), None);
    }

    #[test]
    fn test_log_tail_truncates_long_output() {
        let long = "x".repeat(5000);
        let tail = log_tail(&long).unwrap();
        assert_eq!(tail.len(), 2000);
    }

    #[test]
    fn test_log_tail_respects_char_boundaries() {
        let long = "é".repeat(3000);
        let tail = log_tail(&long).unwrap();
        assert_eq!(tail.chars().count(), 2000);
    }

    #[test]
    fn test_run_report_success() {
        let report = RunReport {
            returncode: 0,
            stdout_tail: None,
            stderr_tail: None,
        };
        assert!(report.success());

        let report = RunReport {
            returncode: 11,
            stdout_tail: None,
            stderr_tail: None,
        };
        assert!(!report.success());
    }

    #[tokio::test]
    async fn test_headless_missing_binary_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("noop.py");
        tokio::fs::write(&script, "print('noop')").await.unwrap();

        let runner = HeadlessBlender::new(
            "/nonexistent/path/to/blender",
            Duration::from_secs(5),
        );
        let result = runner.run_script(&script, tmp.path()).await;
        assert!(matches!(result, Err(BlenderError::NotFound(_))));
    }
}
