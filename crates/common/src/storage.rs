//! Local file storage for uploads and generated outputs
//!
//! Files land on the local filesystem under configured directories. Uploaded
//! files are prefixed with a fresh UUID so colliding client filenames never
//! overwrite each other.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Result;

/// Handle to the upload and output directories.
#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl Storage {
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Get the upload directory, creating it if necessary.
    pub async fn upload_dir(&self) -> Result<&Path> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        Ok(&self.upload_dir)
    }

    /// Get the output directory, creating it if necessary.
    pub async fn output_dir(&self) -> Result<&Path> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(&self.output_dir)
    }

    /// Save uploaded bytes and return `(storage_path, size_bytes)`.
    pub async fn save_upload(&self, filename: &str, bytes: &[u8]) -> Result<(String, i64)> {
        let dir = self.upload_dir().await?;
        let safe_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(filename));
        let dest = dir.join(safe_name);

        tokio::fs::write(&dest, bytes).await?;

        let size = tokio::fs::metadata(&dest).await?.len() as i64;
        Ok((dest.to_string_lossy().into_owned(), size))
    }
}

/// Strip path separators from a client-supplied filename.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_upload_writes_file_and_reports_size() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Storage::new(tmp.path().join("uploads"), tmp.path().join("outputs"));

        let (path, size) = storage.save_upload("drawing.png", b"fake-png-bytes").await.unwrap();

        assert_eq!(size, 14);
        assert!(path.ends_with("_drawing.png"));
        let contents = tokio::fs::read(&path).await.unwrap();
        assert_eq!(contents, b"fake-png-bytes");
    }

    #[tokio::test]
    async fn test_save_upload_unique_names() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Storage::new(tmp.path().join("uploads"), tmp.path().join("outputs"));

        let (a, _) = storage.save_upload("same.stl", b"a").await.unwrap();
        let (b, _) = storage.save_upload("same.stl", b"b").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_save_upload_sanitizes_path_separators() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Storage::new(tmp.path().join("uploads"), tmp.path().join("outputs"));

        let (path, _) = storage
            .save_upload("../../etc/passwd", b"nope")
            .await
            .unwrap();

        // The stored file stays inside the upload directory.
        let stored = std::path::Path::new(&path);
        assert!(stored.starts_with(tmp.path().join("uploads")));
    }

    #[tokio::test]
    async fn test_output_dir_created_on_demand() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Storage::new(tmp.path().join("uploads"), tmp.path().join("outputs"));

        let dir = storage.output_dir().await.unwrap();
        assert!(dir.is_dir());
    }
}
