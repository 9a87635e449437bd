//! Reading the uploaded payslip and staging it on disk.

use std::io::{self, Write};
use std::path::Path;

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use tempfile::NamedTempFile;

use crate::error::{ServiceError, ServiceResult};

/// Multipart field carrying the PDF.
pub const FILE_FIELD: &str = "file";

/// Filename assumed when the client sends none.
pub const DEFAULT_FILENAME: &str = "unknown.pdf";

/// A validated, non-empty PDF upload held in memory.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Filename supplied by the client.
    pub filename: String,
    /// File content.
    pub bytes: Bytes,
}

/// Returns true if `filename` names a PDF (`.pdf`, any case).
///
/// # Example
///
/// ```
/// use payroll_api::api::is_pdf_filename;
///
/// assert!(is_pdf_filename("Lonebesked_Maj.PDF"));
/// assert!(!is_pdf_filename("lonebesked.pdf.txt"));
/// ```
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

/// Pulls the `file` field out of a multipart body.
///
/// The filename is checked before the part's content is read, so a
/// rejected upload is never buffered. Fields other than `file` are skipped.
pub async fn read_upload(multipart: &mut Multipart) -> ServiceResult<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();

        if !is_pdf_filename(&filename) {
            return Err(ServiceError::NotAPdf { filename });
        }

        let bytes = field.bytes().await.map_err(malformed)?;
        if bytes.is_empty() {
            return Err(ServiceError::EmptyUpload { filename });
        }

        return Ok(Upload { filename, bytes });
    }

    Err(ServiceError::MissingFileField {
        field: FILE_FIELD.to_string(),
    })
}

fn malformed(err: MultipartError) -> ServiceError {
    ServiceError::MalformedUpload {
        status: err.status().as_u16(),
        message: err.body_text(),
    }
}

/// Writes `bytes` to a new uniquely named `payroll-*.pdf` file in `dir`.
///
/// The returned handle deletes the file when dropped, so every exit path
/// of the caller, including unwinding and cancellation, cleans up.
pub async fn stage_upload(dir: &Path, bytes: Bytes) -> ServiceResult<NamedTempFile> {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || -> io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("payroll-")
            .suffix(".pdf")
            .tempfile_in(&dir)?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(file)
    })
    .await
    .map_err(|e| ServiceError::TempFile(io::Error::other(e)))?
    .map_err(ServiceError::TempFile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pdf_extension_is_case_insensitive() {
        assert!(is_pdf_filename("slip.pdf"));
        assert!(is_pdf_filename("slip.PDF"));
        assert!(is_pdf_filename("slip.Pdf"));
        assert!(is_pdf_filename(DEFAULT_FILENAME));
    }

    #[test]
    fn test_non_pdf_names_are_rejected() {
        assert!(!is_pdf_filename("notes.txt"));
        assert!(!is_pdf_filename("slip.pdf.exe"));
        assert!(!is_pdf_filename("pdf"));
        assert!(!is_pdf_filename(""));
        assert!(!is_pdf_filename("löneblad.pdfx"));
    }

    proptest! {
        #[test]
        fn prop_pdf_suffix_always_accepted(stem in "\\PC{0,40}", ext in "[pP][dD][fF]") {
            let name = format!("{}.{}", stem, ext);
            prop_assert!(is_pdf_filename(&name));
        }

        #[test]
        fn prop_other_suffixes_always_rejected(
            stem in "\\PC{0,40}",
            ext in "[a-zA-Z0-9]{1,5}",
        ) {
            prop_assume!(!ext.eq_ignore_ascii_case("pdf"));
            let name = format!("{}.{}", stem, ext);
            prop_assert!(!is_pdf_filename(&name));
        }
    }

    #[tokio::test]
    async fn test_stage_upload_writes_unique_pdf_files() {
        let dir = tempfile::tempdir().unwrap();

        let first = stage_upload(dir.path(), Bytes::from_static(b"%PDF-1.7 a"))
            .await
            .unwrap();
        let second = stage_upload(dir.path(), Bytes::from_static(b"%PDF-1.7 b"))
            .await
            .unwrap();

        assert_ne!(first.path(), second.path());
        assert_eq!(std::fs::read(first.path()).unwrap(), b"%PDF-1.7 a");
        let name = first.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("payroll-"));
        assert!(name.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_staged_file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        let staged = stage_upload(dir.path(), Bytes::from_static(b"%PDF-1.7"))
            .await
            .unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_stage_upload_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = stage_upload(&missing, Bytes::from_static(b"%PDF-1.7")).await;

        assert!(matches!(result, Err(ServiceError::TempFile(_))));
    }
}
