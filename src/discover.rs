use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::FatalError;

/// Verify the base directory precondition once, before traversal starts.
/// A missing or non-directory path is fatal for the whole run.
pub fn check_basedir(root: &Path) -> Result<(), FatalError> {
    if !root.exists() {
        return Err(FatalError::BasedirMissing {
            path: root.display().to_string(),
        });
    }
    if !root.is_dir() {
        return Err(FatalError::BasedirNotADirectory {
            path: root.display().to_string(),
        });
    }
    Ok(())
}

/// Walk `root` recursively, yielding every regular file underneath it.
///
/// The sequence is lazy and finite; directories themselves are never
/// yielded. Symlinks and special files are skipped, and subtrees the walker
/// cannot read are skipped as well, both reported through `on_warning`
/// rather than aborting the walk. Other processes may mutate the tree
/// concurrently; entries that disappear mid-walk simply surface as
/// warnings here or as upload failures later.
pub fn discover_files<F>(root: &Path, mut on_warning: F) -> impl Iterator<Item = PathBuf>
where
    F: FnMut(Option<&Path>, &str),
{
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                let file_type = entry.file_type();
                if file_type.is_file() {
                    Some(entry.into_path())
                } else if file_type.is_dir() {
                    None
                } else {
                    on_warning(
                        Some(entry.path()),
                        "skipping non-regular file (symlink or special file)",
                    );
                    None
                }
            }
            Err(err) => {
                let path = err.path().map(Path::to_path_buf);
                on_warning(path.as_deref(), &format!("traversal error: {err}"));
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn no_warnings(path: Option<&Path>, reason: &str) {
        panic!("unexpected warning for {path:?}: {reason}");
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let dir = TempDir::new().expect("tempdir");
        let found: Vec<_> = discover_files(dir.path(), no_warnings).collect();
        assert!(found.is_empty());
    }

    #[test]
    fn test_all_files_visited_exactly_once() {
        let dir = TempDir::new().expect("tempdir");
        let root = dir.path();
        fs::create_dir_all(root.join("a/b")).expect("mkdir");
        fs::create_dir(root.join("c")).expect("mkdir");
        fs::write(root.join("top.txt"), b"1").expect("write");
        fs::write(root.join("a/mid.txt"), b"2").expect("write");
        fs::write(root.join("a/b/deep.txt"), b"3").expect("write");
        fs::write(root.join("c/other.txt"), b"4").expect("write");

        let found: Vec<_> = discover_files(root, no_warnings).collect();
        let unique: HashSet<_> = found.iter().cloned().collect();

        assert_eq!(found.len(), 4, "each file visited exactly once");
        assert_eq!(unique.len(), 4);
        for name in ["top.txt", "a/mid.txt", "a/b/deep.txt", "c/other.txt"] {
            assert!(unique.contains(&root.join(name)), "missing {name}");
        }
    }

    #[test]
    fn test_directories_are_not_yielded() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        fs::write(dir.path().join("sub/f"), b"x").expect("write");

        let found: Vec<_> = discover_files(dir.path(), no_warnings).collect();
        assert_eq!(found, vec![dir.path().join("sub/f")]);
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_is_skipped_with_warning() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("real"), b"x").expect("write");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link"))
            .expect("symlink");

        let mut warned = Vec::new();
        let found: Vec<_> = discover_files(dir.path(), |path, _reason| {
            warned.push(path.map(Path::to_path_buf));
        })
        .collect();

        assert_eq!(found, vec![dir.path().join("real")]);
        assert_eq!(warned, vec![Some(dir.path().join("link"))]);
    }

    #[test]
    fn test_check_basedir_missing_is_fatal() {
        let err = check_basedir(Path::new("/nonexistent/sweep/root")).unwrap_err();
        assert!(matches!(err, FatalError::BasedirMissing { .. }));
    }

    #[test]
    fn test_check_basedir_rejects_plain_file() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"x").expect("write");

        let err = check_basedir(&file).unwrap_err();
        assert!(matches!(err, FatalError::BasedirNotADirectory { .. }));
    }

    #[test]
    fn test_check_basedir_accepts_directory() {
        let dir = TempDir::new().expect("tempdir");
        assert!(check_basedir(dir.path()).is_ok());
    }
}
