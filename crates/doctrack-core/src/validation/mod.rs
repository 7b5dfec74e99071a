//! Validation helpers
//!
//! Field-level rules live on the request types (`validator` derives). This
//! module holds the checks that need the filesystem.

use std::path::{Component, Path};

use crate::error::{AppError, AppResult};

/// Reject upload paths with `..` components, missing files, and non-files.
pub fn validate_upload_path(path: &Path) -> AppResult<()> {
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(AppError::InvalidInput(format!(
            "Path must not contain '..': {}",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(path).map_err(|err| {
        AppError::InvalidInput(format!("Cannot read {}: {}", path.display(), err))
    })?;
    if !metadata.is_file() {
        return Err(AppError::InvalidInput(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Final path component as UTF-8, used as the uploaded file name.
pub fn upload_file_name(path: &Path) -> AppResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidInput(format!("No file name in {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accepts_regular_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "contents").unwrap();
        assert!(validate_upload_path(file.path()).is_ok());
        assert!(upload_file_name(file.path()).is_ok());
    }

    #[test]
    fn test_rejects_parent_dir_components() {
        let err = validate_upload_path(Path::new("../secret.pdf")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_directories_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_upload_path(dir.path()).is_err());
        assert!(validate_upload_path(&dir.path().join("missing.pdf")).is_err());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            upload_file_name(Path::new("/tmp/scans/passport.pdf")).unwrap(),
            "passport.pdf"
        );
        assert!(upload_file_name(Path::new("/")).is_err());
    }
}
