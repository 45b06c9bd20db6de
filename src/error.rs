use std::path::Path;

use thiserror::Error;

/// Precondition failures that abort the run before any file is touched.
///
/// Everything else that can go wrong is scoped to a single file and is
/// reported through [`crate::s3::UploadOutcome`] instead, so the run keeps
/// going.
#[derive(Error, Debug)]
pub enum FatalError {
    /// Base directory does not exist
    #[error("base directory not found: {path}")]
    BasedirMissing { path: String },

    /// Base directory exists but is not a directory
    #[error("not a directory: {path}")]
    BasedirNotADirectory { path: String },

    /// Bucket missing from the accessible buckets for the current credentials
    #[error("bucket '{bucket}' not found or not accessible")]
    BucketNotFound { bucket: String },

    /// The backend itself could not be reached (network/auth), as opposed to
    /// a definitive "bucket not found" answer
    #[error("storage backend unavailable: {0}")]
    Backend(#[from] StoreError),
}

/// Errors surfaced by an [`crate::s3::ObjectStore`] implementation
#[derive(Error, Debug)]
pub enum StoreError {
    /// Local file vanished between discovery and transmission
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Permission denied reading the local file
    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    /// Local file could not be read for another reason
    #[error("failed to read {path}: {message}")]
    Unreadable { path: String, message: String },

    /// Backend access denied
    #[error("access denied for bucket '{bucket}': {message}")]
    AccessDenied { bucket: String, message: String },

    /// Network-related error
    #[error("network error: {message}")]
    Network { message: String },

    /// Backend-side error wrapper
    #[error("backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    /// Classify an AWS SDK error into access-denied vs generic backend error
    pub fn from_aws_error<E: std::fmt::Display>(bucket: &str, error: E) -> Self {
        let message = error.to_string();
        if message.to_lowercase().contains("access denied")
            || message.to_lowercase().contains("forbidden")
        {
            Self::AccessDenied {
                bucket: bucket.to_string(),
                message,
            }
        } else {
            Self::Backend { message }
        }
    }

    /// Classify an IO error while reading the local source file
    pub fn from_io_error(error: std::io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Unreadable {
                path,
                message: error.to_string(),
            },
        }
    }
}
