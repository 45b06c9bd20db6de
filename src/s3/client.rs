use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{Client, error::SdkError, primitives::ByteStream};

use crate::config::Config;
use crate::error::StoreError;

/// The two backend operations the pipeline consumes: a bucket existence
/// probe and a whole-object put. Implemented by [`S3Store`] for real runs
/// and by in-memory fakes in tests, so the sweep loop never touches the
/// network in its own test suite.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Probe whether the bucket exists and is accessible to the current
    /// credentials. `Ok(false)` means a definitive "not found"; `Err` means
    /// the backend itself could not be consulted. Both answers are fatal to
    /// the caller, but must stay distinguishable.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError>;

    /// Store the full byte content of `local_path` under `key`, overwriting
    /// any existing object. One attempt; no retry, no multipart.
    async fn put_object(&self, bucket: &str, key: &str, local_path: &Path)
    -> Result<(), StoreError>;
}

/// Real S3-backed store. Credentials and region resolve through the SDK
/// default chain, optionally pinned via `AWS_REGION`/`AWS_PROFILE`.
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub async fn new(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(ctx)) => {
                if ctx.err().is_not_found() {
                    Ok(false)
                } else {
                    Err(StoreError::from_aws_error(bucket, ctx.err()))
                }
            }
            Err(err) => Err(StoreError::Network {
                message: err.to_string(),
            }),
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
    ) -> Result<(), StoreError> {
        let metadata = tokio::fs::metadata(local_path)
            .await
            .map_err(|e| StoreError::from_io_error(e, local_path))?;

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StoreError::Unreadable {
                path: local_path.display().to_string(),
                message: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_length(metadata.len() as i64)
            .send()
            .await
            .map_err(|e| StoreError::from_aws_error(bucket, e))?;

        Ok(())
    }
}
