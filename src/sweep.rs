//! The reconcile loop: upload each discovered file, then delete the local
//! copy only once the upload is confirmed.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::discover::{check_basedir, discover_files};
use crate::error::FatalError;
use crate::s3::{ObjectStore, UploadOutcome, upload_task};
use crate::task::FileTask;

/// How one file's trip through the pipeline ended.
#[derive(Debug)]
pub enum FileOutcome {
    /// Uploaded and removed locally
    Swept { path: PathBuf, key: String },
    /// Uploaded, but the local delete failed. The remote copy is safe; the
    /// file is picked up again next run and overwrites the same key.
    CleanupFailed {
        path: PathBuf,
        key: String,
        reason: String,
    },
    /// Upload failed; the local file is untouched
    Failed { path: PathBuf, reason: String },
}

/// Aggregate result of one run, reported at the end. Per-item failures live
/// here instead of the process exit code.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<FileOutcome>,
    /// Traversal warnings (unreadable subtrees, skipped symlinks)
    pub walk_warnings: usize,
}

impl RunSummary {
    pub fn swept(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Swept { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Failed { .. }))
            .count()
    }

    pub fn cleanup_failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::CleanupFailed { .. }))
            .count()
    }
}

/// Run the whole pipeline: precondition checks, then one sequential
/// upload-then-delete-or-report cycle per discovered file.
///
/// Fatal preconditions (missing basedir, unknown or unreachable bucket)
/// return `Err` before any file is processed. After that point nothing
/// aborts the run: each file's outcome is recorded and the loop moves on.
/// Files are processed strictly one at a time, which keeps the
/// delete-after-upload ordering trivially safe; tasks are self-contained,
/// so a worker pool could be layered on later without reshaping them.
pub async fn run(
    store: &dyn ObjectStore,
    bucket: &str,
    basedir: &Path,
) -> Result<RunSummary, FatalError> {
    check_basedir(basedir)?;

    if !store.bucket_exists(bucket).await? {
        return Err(FatalError::BucketNotFound {
            bucket: bucket.to_string(),
        });
    }

    let mut summary = RunSummary::default();
    let mut walk_warnings = 0usize;

    let files = discover_files(basedir, |path, reason| {
        walk_warnings += 1;
        match path {
            Some(p) => warn!(path = %p.display(), "{reason}"),
            None => warn!("{reason}"),
        }
    });

    for path in files {
        summary.outcomes.push(process_file(store, bucket, path).await);
    }

    summary.walk_warnings = walk_warnings;

    info!(
        swept = summary.swept(),
        failed = summary.failed(),
        cleanup_failed = summary.cleanup_failed(),
        "sweep finished"
    );

    Ok(summary)
}

/// One file's full cycle: derive key, upload, then delete or report.
async fn process_file(store: &dyn ObjectStore, bucket: &str, path: PathBuf) -> FileOutcome {
    // Stat failure here usually means the file vanished after discovery;
    // that is this file's failure, not the run's.
    let task = match FileTask::from_path(&path) {
        Ok(task) => task,
        Err(err) => {
            let reason = format!("could not read metadata: {err}");
            warn!(path = %path.display(), "{reason}");
            return FileOutcome::Failed { path, reason };
        }
    };

    match upload_task(store, bucket, &task).await {
        UploadOutcome::Success => match tokio::fs::remove_file(&task.source_path).await {
            Ok(()) => {
                info!(
                    path = %task.source_path.display(),
                    key = %task.object_key,
                    "uploaded and removed"
                );
                FileOutcome::Swept {
                    path: task.source_path,
                    key: task.object_key,
                }
            }
            Err(err) => {
                // The object is already durably stored, so a failed delete is
                // a cleanup anomaly. The deterministic key makes the re-upload
                // on the next run overwrite the same object.
                warn!(
                    path = %task.source_path.display(),
                    key = %task.object_key,
                    "uploaded but local delete failed: {err}"
                );
                FileOutcome::CleanupFailed {
                    path: task.source_path,
                    key: task.object_key,
                    reason: err.to_string(),
                }
            }
        },
        UploadOutcome::Failure(reason) => {
            warn!(path = %task.source_path.display(), "upload failed: {reason}");
            FileOutcome::Failed {
                path: task.source_path,
                reason,
            }
        }
    }
}
