use tracing::debug;

use crate::s3::ObjectStore;
use crate::task::FileTask;

/// Result of a single upload attempt. A failure carries a human-readable
/// reason for the report; it never propagates past the sweep loop.
#[derive(Debug)]
pub enum UploadOutcome {
    Success,
    Failure(String),
}

/// Transmit one file's bytes to the bucket under the task's derived key.
///
/// Every failure mode (file vanished or unreadable, network, auth, backend
/// error) collapses into `Failure` with a reason string. Deleting the local
/// file is deliberately not done here: the delete decision stays centralized
/// in the sweep loop.
pub async fn upload_task(store: &dyn ObjectStore, bucket: &str, task: &FileTask) -> UploadOutcome {
    debug!(
        path = %task.source_path.display(),
        key = %task.object_key,
        "uploading"
    );

    match store
        .put_object(bucket, &task.object_key, &task.source_path)
        .await
    {
        Ok(()) => UploadOutcome::Success,
        Err(err) => UploadOutcome::Failure(err.to_string()),
    }
}
