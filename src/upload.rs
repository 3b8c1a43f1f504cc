//! Upload Coordinator
//!
//! Acquires a file from disk, checks it against the formats the service
//! can parse, submits it, and turns the reply into a [`DatasetDescriptor`].
//! Committing the descriptor (and re-deriving the selection) is done by the
//! workflow so both happen under one lock.

use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::models::DatasetDescriptor;
use crate::service::AnalysisService;
use crate::types::{AppError, AppResult};

/// Extensions the analysis service accepts
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["xlsx", "xls", "csv", "json", "txt"];

/// A file ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();
        Self { name, mime, bytes }
    }

    /// Read a file from disk. Unsupported extensions are rejected before
    /// the file is read.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::Io(format!("{} is not a file", path.display())))?;

        check_extension(&name)?;

        let bytes = fs::read(path).await?;
        Ok(Self::new(name, bytes))
    }
}

/// Accept only the formats the service can parse.
pub fn check_extension(name: &str) -> AppResult<()> {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(AppError::UnsupportedFile(format!(
            "{} (supported: {})",
            if ext.is_empty() { "<none>".to_string() } else { format!(".{}", ext) },
            ALLOWED_EXTENSIONS
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

/// Submit `file` and build the descriptor from the reply.
pub async fn submit(
    service: &dyn AnalysisService,
    file: &UploadFile,
) -> AppResult<DatasetDescriptor> {
    check_extension(&file.name)?;

    let response = service.upload(file).await.map_err(|e| {
        warn!(file = %file.name, error = %e, "Upload failed");
        e
    })?;
    let dataset = response.into_descriptor(&file.name)?;

    info!(
        file = %dataset.original_filename,
        stored_as = %dataset.filename,
        rows = dataset.row_count,
        columns = dataset.columns.len(),
        "Dataset uploaded"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_check_extension() {
        assert_ok!(check_extension("sales.csv"));
        assert_ok!(check_extension("Report.XLSX"));
        assert_ok!(check_extension("notes.txt"));

        let err = check_extension("payload.exe").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFile(ref m) if m.starts_with(".exe")));
        assert_err!(check_extension("README"));
    }

    #[test]
    fn test_mime_is_guessed_from_name() {
        let file = UploadFile::new("data.json", b"[]".to_vec());
        assert_eq!(file.mime, "application/json");
        let file = UploadFile::new("data.csv", Vec::new());
        assert_eq!(file.mime, "text/csv");
    }

    #[tokio::test]
    async fn test_from_path_reads_supported_file() {
        let dir = std::env::temp_dir().join(format!("datalens-upload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("small.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "small.csv");
        assert_eq!(file.bytes, b"a,b\n1,2\n");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_from_path_rejects_before_reading() {
        // The file does not exist: the extension check must fail first.
        let err = UploadFile::from_path("/nonexistent/archive.zip").await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFile(_)));

        let err = UploadFile::from_path("/nonexistent/missing.csv").await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
