//! Filesystem helpers for recycle bin artifact discovery.
//!
//! [`collect_files`] is the one recursive walker in the crate. It backs
//! [`find_recycle_bin_files`], which searches a directory (a mounted volume,
//! an exported `$Recycle.Bin` or `RECYCLER` folder) for `INFO2` databases and
//! `$I` index files, and the `$RR` companion listing in
//! [`crate::recyclebin::companion`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::recyclebin::constants::{DOLLAR_I_PREFIX, INFO2_FILE_NAME};
use crate::RbinError;

/// What [`collect_files`] does with a subdirectory or entry it cannot read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkErrors {
    /// Log a warning and keep walking.
    Skip,
    /// Stop and return the error.
    Fail,
}

/// Recursively collect `(path, size)` for every file below `dir` whose path
/// passes `keep`.
///
/// Symbolic links to directories are not descended. Symbolic links to files
/// are resolved and reported with the size of their target. An unreadable
/// `dir` is always an error; everything below it follows `on_error`.
/// Results are sorted by path.
pub fn collect_files(
    dir: &Path,
    on_error: WalkErrors,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<(PathBuf, u64)>, RbinError> {
    let mut files = Vec::new();
    let mut pending: Vec<PathBuf> = Vec::new();

    let root = fs::read_dir(dir)
        .map_err(|e| RbinError::Io(format!("Cannot read directory {}: {}", dir.display(), e)))?;
    visit_entries(root, on_error, &keep, &mut files, &mut pending)?;

    while let Some(sub_dir) = pending.pop() {
        match fs::read_dir(&sub_dir) {
            Ok(entries) => visit_entries(entries, on_error, &keep, &mut files, &mut pending)?,
            Err(e) => skip_or_fail(
                on_error,
                RbinError::Io(format!("Error accessing '{}': {}", sub_dir.display(), e)),
            )?,
        }
    }

    files.sort();
    Ok(files)
}

fn visit_entries(
    entries: fs::ReadDir,
    on_error: WalkErrors,
    keep: &impl Fn(&Path) -> bool,
    files: &mut Vec<(PathBuf, u64)>,
    pending: &mut Vec<PathBuf>,
) -> Result<(), RbinError> {
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skip_or_fail(
                    on_error,
                    RbinError::Io(format!("Cannot read directory entry: {}", e)),
                )?;
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                skip_or_fail(
                    on_error,
                    RbinError::Io(format!("Error accessing '{}': {}", path.display(), e)),
                )?;
                continue;
            }
        };

        if file_type.is_dir() {
            pending.push(path);
            continue;
        }
        if !keep(&path) {
            continue;
        }

        // fs::metadata follows symlinks, so a link to a file reports its target
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                tracing::debug!("Found match: '{}'", path.display());
                files.push((path, meta.len()));
            }
            Ok(_) => {}
            Err(e) => skip_or_fail(
                on_error,
                RbinError::Io(format!("Cannot stat {}: {}", path.display(), e)),
            )?,
        }
    }

    Ok(())
}

fn skip_or_fail(on_error: WalkErrors, err: RbinError) -> Result<(), RbinError> {
    match on_error {
        WalkErrors::Skip => {
            tracing::warn!("{}", err);
            Ok(())
        }
        WalkErrors::Fail => Err(err),
    }
}

/// Recursively find `INFO2` and `$I*` files below `dir`.
///
/// Unreadable subdirectories and dangling links are logged and skipped;
/// only an unreadable `dir` itself is an error. Results are sorted by path.
pub fn find_recycle_bin_files(dir: &Path) -> Result<Vec<PathBuf>, RbinError> {
    let found = collect_files(dir, WalkErrors::Skip, is_recycle_bin_artifact)?;
    Ok(found.into_iter().map(|(path, _)| path).collect())
}

/// Returns true if the file name marks a recycle bin metadata file
/// (`INFO2`, or any name starting with `$I`).
pub fn is_recycle_bin_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name == INFO2_FILE_NAME || name.starts_with(DOLLAR_I_PREFIX))
}
