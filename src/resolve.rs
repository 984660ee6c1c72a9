// src/resolve.rs

//! Turn the user's input into the initial list of files to watch.
//!
//! Paths either come from STDIN (one per line) or from `--input`, which may
//! be a single file, a directory or a glob pattern.

use std::io::{self, BufRead};
use std::path::{Component, Path, PathBuf};

use globset::GlobBuilder;
use tracing::debug;

use crate::errors::{GentrError, Result};
use crate::fs::{FileSystem, walk_files};

const GLOB_CHARS: &[char] = &['*', '?', '[', ']'];

/// Whether `input` should be treated as a glob pattern.
pub fn is_glob(input: &str) -> bool {
    input.contains(GLOB_CHARS)
}

/// Read a newline-separated path list, trimming lines and skipping blanks.
pub fn parse_path_list<R: BufRead>(reader: R) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    Ok(paths)
}

/// Resolve `--input` into files.
///
/// - glob: every matching file below the pattern's literal base directory;
/// - directory: its top-level files, or all files below it when `recursive`;
/// - anything else must be an existing file.
pub fn resolve_input(fs: &dyn FileSystem, input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    if is_glob(input) {
        return expand_glob(fs, input);
    }

    let path = Path::new(input);
    if fs.is_dir(path) {
        let depth = if recursive { None } else { Some(0) };
        let files = walk_files(fs, path, depth)?;
        debug!(input, count = files.len(), recursive, "resolved directory input");
        return Ok(files);
    }
    if fs.is_file(path) {
        return Ok(vec![path.to_path_buf()]);
    }

    let source = match fs.modified(path) {
        Err(err) => err,
        Ok(_) => io::Error::new(io::ErrorKind::InvalidInput, "not a regular file or directory"),
    };
    Err(GentrError::InputError {
        path: input.to_string(),
        source,
    })
}

/// Directories the recursive rescan should walk for this input.
pub fn rescan_roots(fs: &dyn FileSystem, input: &str, recursive: bool) -> Vec<PathBuf> {
    let path = Path::new(input);
    if recursive && !is_glob(input) && fs.is_dir(path) {
        vec![path.to_path_buf()]
    } else {
        Vec::new()
    }
}

/// Expand a glob pattern against the filesystem.
///
/// `*` and `?` never cross a `/`; use `**` to match across directories.
/// Only regular files are returned, sorted.
pub fn expand_glob(fs: &dyn FileSystem, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher();

    let (base, rest) = split_literal_base(pattern);
    let depth = if pattern.contains("**") {
        None
    } else {
        Some(rest.saturating_sub(1))
    };

    if !fs.is_dir(&base) {
        debug!(pattern, base = %base.display(), "glob base is not a directory");
        return Ok(Vec::new());
    }

    let matches: Vec<PathBuf> = walk_files(fs, &base, depth)?
        .into_iter()
        .map(|p| match p.strip_prefix(".") {
            Ok(stripped) => stripped.to_path_buf(),
            Err(_) => p,
        })
        .filter(|p| matcher.is_match(p))
        .collect();

    debug!(pattern, count = matches.len(), "expanded glob");
    Ok(matches)
}

/// Split a pattern into its leading glob-free directory and the number of
/// components that follow it.
fn split_literal_base(pattern: &str) -> (PathBuf, usize) {
    let mut base = PathBuf::new();
    let mut rest = 0;
    let mut in_glob = false;

    for component in Path::new(pattern).components() {
        let literal = match component {
            Component::Normal(part) => !part.to_string_lossy().contains(GLOB_CHARS),
            _ => true,
        };
        if !in_glob && literal {
            base.push(component);
        } else {
            in_glob = true;
            rest += 1;
        }
    }

    // A fully literal pattern names a file; its base is the parent.
    if !in_glob {
        let parent = base.parent().map(Path::to_path_buf).unwrap_or_default();
        return (non_empty(parent), 1);
    }
    (non_empty(base), rest)
}

fn non_empty(path: PathBuf) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path
    }
}
