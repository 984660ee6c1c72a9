// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::debug;

pub mod mock;

/// Abstract filesystem interface.
///
/// Detectors, the rescan task and the coordinator only touch the disk
/// through this trait so they can be driven by [`mock::MockFileSystem`].
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Last modification time.
    ///
    /// Returns the raw `io::Error` so callers can tell `NotFound` (the file
    /// was deleted) apart from transient failures.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// True for a symbolic link itself, without following it.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}

/// Collect every regular file below `root`, sorted.
///
/// `max_depth` counts directory levels below `root`: `Some(0)` lists only
/// the files directly inside `root`, `None` walks the whole tree. Symlinked
/// directories are not descended into; symlinked files are kept.
pub fn walk_files(
    fs: &dyn FileSystem,
    root: &Path,
    max_depth: Option<usize>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![(root.to_path_buf(), 0usize)];

    while let Some((dir, depth)) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                if fs.is_symlink(&path) {
                    debug!(path = %path.display(), "not following directory symlink");
                    continue;
                }
                if max_depth.is_none_or(|max| depth < max) {
                    stack.push((path, depth + 1));
                }
            } else if fs.is_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Split file content into lines the way snapshots are stored.
///
/// Splits on `\n` only, so a trailing newline yields a final empty line and
/// an empty file yields a single empty line.
pub fn split_lines(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn split_lines_keeps_trailing_empty_line() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn walk_respects_depth_limit() {
        let fs = MockFileSystem::new();
        fs.add_file("root/a.txt", "a");
        fs.add_file("root/sub/b.txt", "b");
        fs.add_file("root/sub/deeper/c.txt", "c");

        let top = walk_files(&fs, Path::new("root"), Some(0)).unwrap();
        assert_eq!(top, vec![PathBuf::from("root/a.txt")]);

        let all = walk_files(&fs, Path::new("root"), None).unwrap();
        assert_eq!(
            all,
            vec![
                PathBuf::from("root/a.txt"),
                PathBuf::from("root/sub/b.txt"),
                PathBuf::from("root/sub/deeper/c.txt"),
            ]
        );
    }

    #[test]
    fn walk_skips_symlinked_directories() {
        let fs = MockFileSystem::new();
        fs.add_file("root/a.txt", "a");
        fs.add_file("other/b.txt", "b");
        fs.add_symlink("root/loop", "root");
        fs.add_symlink("root/elsewhere", "other");
        fs.add_symlink("root/alias.txt", "other/b.txt");

        let all = walk_files(&fs, Path::new("root"), None).unwrap();
        assert_eq!(
            all,
            vec![PathBuf::from("root/a.txt"), PathBuf::from("root/alias.txt")]
        );
    }
}
