//! Mock Blender backend for testing job workflows
//!
//! `MockBlender` records every invocation and can be programmed to succeed
//! (optionally fabricating the expected output files), fail with a given
//! return code, or time out.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::{BlenderError, BlenderRunner, RunReport};

/// What outcome the mock should produce
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockOutcome {
    /// Exit 0 and create the configured output files
    #[default]
    Succeed,
    /// Exit with the given return code, no output files
    Fail(i32),
    /// Report a timeout
    Timeout,
}

/// A recorded `run_script` invocation
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub script_path: PathBuf,
    pub workdir: PathBuf,
}

/// Programmable mock Blender backend
#[derive(Clone, Default)]
pub struct MockBlender {
    outcome: Arc<RwLock<MockOutcome>>,
    /// File names (relative to workdir) to create on success.
    output_files: Arc<RwLock<Vec<String>>>,
    history: Arc<Mutex<Vec<RecordedRun>>>,
}

impl MockBlender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outcome(&self, outcome: MockOutcome) {
        *self.outcome.write().unwrap() = outcome;
    }

    /// Configure output files fabricated on success (relative to workdir).
    pub fn set_output_files(&self, files: Vec<String>) {
        *self.output_files.write().unwrap() = files;
    }

    pub fn history(&self) -> Vec<RecordedRun> {
        self.history.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        *self.outcome.write().unwrap() = MockOutcome::Succeed;
        self.output_files.write().unwrap().clear();
        self.history.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl BlenderRunner for MockBlender {
    async fn run_script(
        &self,
        script_path: &Path,
        workdir: &Path,
    ) -> Result<RunReport, BlenderError> {
        self.history.lock().unwrap().push(RecordedRun {
            script_path: script_path.to_path_buf(),
            workdir: workdir.to_path_buf(),
        });

        let outcome = self.outcome.read().unwrap().clone();
        match outcome {
            MockOutcome::Succeed => {
                let files = self.output_files.read().unwrap().clone();
                for name in files {
                    tokio::fs::write(workdir.join(&name), b"mock-output").await?;
                }
                Ok(RunReport {
                    returncode: 0,
                    stdout_tail: Some("OK_EXPORT: mock".to_string()),
                    stderr_tail: None,
                })
            }
            MockOutcome::Fail(code) => Ok(RunReport {
                returncode: code,
                stdout_tail: None,
                stderr_tail: Some("mock failure".to_string()),
            }),
            MockOutcome::Timeout => Err(BlenderError::Timeout(0)),
        }
    }
}
