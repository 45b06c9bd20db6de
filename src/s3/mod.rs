pub mod client;
pub mod upload;

pub use client::{ObjectStore, S3Store};
pub use upload::{UploadOutcome, upload_task};
