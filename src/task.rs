use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Timelike};

/// Suffix enforced on every derived object key leaf. Appended only when the
/// file name does not already carry it (exact, case-sensitive match).
pub const KEY_SUFFIX: &str = ".dat";

/// One file's unit of work: discovered path, its modification time, and the
/// object key derived from both. Built once per discovered file, consumed
/// exactly once by the sweep loop, never persisted across runs.
#[derive(Debug, Clone)]
pub struct FileTask {
    pub source_path: PathBuf,
    /// Last-modified timestamp in local time, truncated to minute precision
    pub mod_time: DateTime<Local>,
    /// Derived object key, immutable after construction
    pub object_key: String,
}

impl FileTask {
    /// Build a task for a discovered path by reading its modification time.
    ///
    /// This is the only stat the pipeline performs before the upload itself;
    /// a file that cannot be stat'ed is reported as that file's failure, not
    /// a run failure.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let mod_time = truncate_to_minute(DateTime::<Local>::from(metadata.modified()?));
        let object_key = derive_key(path, mod_time);

        Ok(Self {
            source_path: path.to_path_buf(),
            mod_time,
            object_key,
        })
    }
}

fn truncate_to_minute(ts: DateTime<Local>) -> DateTime<Local> {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// Derive the object key for a file:
/// `{dir}/{YYYY}/{MM}/{DD}/{HH}/{mm}-{name}.dat`, where the timestamp
/// segments come from the file's modification time in local time.
///
/// Pure and deterministic: the same path and mtime always produce the same
/// key, which is what makes re-uploading after a failed local delete
/// idempotent (the object is simply overwritten).
///
/// Known gaps, accepted rather than guarded: the full local directory path
/// (basedir included, leading `/` trimmed) is embedded in the key, so local
/// filesystem layout leaks into the bucket and two hosts with identical
/// layouts can collide; two same-named files with the same mtime collide
/// last-write-wins at the storage layer.
pub fn derive_key(path: &Path, mod_time: DateTime<Local>) -> String {
    let mut leaf = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !leaf.ends_with(KEY_SUFFIX) {
        leaf.push_str(KEY_SUFFIX);
    }

    let stamp = mod_time.format("%Y/%m/%d/%H/%M");

    let dir = path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = dir.trim_matches('/');

    if dir.is_empty() {
        format!("{stamp}-{leaf}")
    } else {
        format!("{dir}/{stamp}-{leaf}")
    }
}
