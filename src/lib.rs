pub mod config;
pub mod discover;
pub mod error;
pub mod s3;
pub mod sweep;
pub mod task;
