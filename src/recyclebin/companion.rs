//! `$RR` companion directory enumeration.
//!
//! When a folder is deleted, its `$I` file is named `$IR<id>` and the folder
//! contents are moved to a sibling directory `$RR<id>`. Listing that
//! directory recovers the names and sizes of every file that was inside the
//! deleted folder. This is the only part of `$I` handling that touches the
//! filesystem, so it runs as a separate step after
//! [`DeletedItemRecord::parse`](crate::recyclebin::dollar_i::DeletedItemRecord::parse).

use std::path::{Path, PathBuf};

use crate::recyclebin::constants::{DOLLAR_I_DIRECTORY_PREFIX, DOLLAR_R_DIRECTORY_PREFIX};
use crate::recyclebin::dollar_i::{DeletedItemRecord, DirectoryFile};
use crate::util::fs::{collect_files, WalkErrors};
use crate::RbinError;

/// Path of the `$RR` directory that would belong to `artifact_path`.
///
/// Returns `None` when the artifact's file name does not start with `$IR`.
/// The returned path is not checked for existence.
pub fn companion_directory(artifact_path: &Path) -> Option<PathBuf> {
    let name = artifact_path.file_name()?.to_str()?;
    let id = name.strip_prefix(DOLLAR_I_DIRECTORY_PREFIX)?;
    Some(artifact_path.with_file_name(format!("{}{}", DOLLAR_R_DIRECTORY_PREFIX, id)))
}

/// Fill `record.directory_files` from the companion directory of
/// `artifact_path`, if there is one.
///
/// A missing companion directory leaves the list empty and is not an error.
/// On error the record is left untouched.
pub fn attach_directory_files(
    record: &mut DeletedItemRecord,
    artifact_path: &Path,
) -> Result<(), RbinError> {
    let Some(dir) = companion_directory(artifact_path) else {
        return Ok(());
    };
    if !dir.is_dir() {
        return Ok(());
    }

    tracing::debug!("Listing companion directory {}", dir.display());
    record.directory_files = list_directory_files(&dir, &record.file_name)?;
    Ok(())
}

/// Recursively list the files below `dir`, renaming each one so that `dir`
/// is replaced by `original_path`.
///
/// Symbolic links to files are listed with their target's size; linked
/// directories are not descended. Any unreadable entry fails the whole
/// listing. Results are sorted by path.
pub fn list_directory_files(
    dir: &Path,
    original_path: &str,
) -> Result<Vec<DirectoryFile>, RbinError> {
    let found = collect_files(dir, WalkErrors::Fail, |_| true)?;

    let separator = if original_path.contains('\\') { "\\" } else { "/" };

    Ok(found
        .into_iter()
        .map(|(path, file_size)| {
            let relative = path.strip_prefix(dir).unwrap_or(&path);
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            DirectoryFile {
                file_name: format!("{}{}{}", original_path, separator, parts.join(separator)),
                file_size,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recyclebin::dollar_i::DollarIFormat;
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;

    fn record(name: &str) -> DeletedItemRecord {
        DeletedItemRecord {
            format: DollarIFormat::Win10,
            file_size: 0,
            deleted_on: Utc::now(),
            file_name: name.to_string(),
            source_name: String::new(),
            directory_files: Vec::new(),
        }
    }

    #[test]
    fn test_companion_directory_name() {
        let path = Path::new("/evidence/S-1-5-21/$IR4T2KQ");
        assert_eq!(
            companion_directory(path),
            Some(PathBuf::from("/evidence/S-1-5-21/$RR4T2KQ"))
        );
    }

    #[test]
    fn test_no_companion_for_plain_file() {
        assert_eq!(companion_directory(Path::new("/evidence/$I3VPA17.txt")), None);
        assert_eq!(companion_directory(Path::new("/evidence/INFO2")), None);
    }

    #[test]
    fn test_attach_without_companion_dir() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("$IR0001");
        fs::write(&artifact, b"x").unwrap();

        let mut rec = record("C:\\Users\\a\\Folder");
        attach_directory_files(&mut rec, &artifact).unwrap();
        assert!(rec.directory_files.is_empty());
    }

    #[test]
    fn test_attach_lists_nested_files() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("$IR0001");
        fs::write(&artifact, b"x").unwrap();

        let rr = dir.path().join("$RR0001");
        fs::create_dir_all(rr.join("sub")).unwrap();
        fs::write(rr.join("a.txt"), b"12345").unwrap();
        fs::write(rr.join("sub").join("b.bin"), vec![0u8; 300]).unwrap();

        let mut rec = record("C:\\Users\\a\\Folder");
        attach_directory_files(&mut rec, &artifact).unwrap();

        assert_eq!(
            rec.directory_files,
            vec![
                DirectoryFile {
                    file_name: "C:\\Users\\a\\Folder\\a.txt".to_string(),
                    file_size: 5,
                },
                DirectoryFile {
                    file_name: "C:\\Users\\a\\Folder\\sub\\b.bin".to_string(),
                    file_size: 300,
                },
            ]
        );
    }

    #[test]
    fn test_list_uses_forward_slash_for_unix_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.md"), b"hi").unwrap();

        let files = list_directory_files(dir.path(), "/home/a/docs").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "/home/a/docs/notes.md");
        assert_eq!(files[0].file_size, 2);
    }

    #[test]
    fn test_list_missing_directory_errors() {
        let result = list_directory_files(Path::new("/nonexistent/$RR0001"), "C:\\x");
        assert!(matches!(result, Err(RbinError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_includes_symlinked_files() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        fs::write(other.path().join("target.bin"), vec![0u8; 64]).unwrap();
        fs::write(dir.path().join("plain.txt"), b"abc").unwrap();
        std::os::unix::fs::symlink(other.path().join("target.bin"), dir.path().join("link.bin"))
            .unwrap();

        let files = list_directory_files(dir.path(), "C:\\F").unwrap();
        assert_eq!(
            files,
            vec![
                DirectoryFile {
                    file_name: "C:\\F\\link.bin".to_string(),
                    file_size: 64,
                },
                DirectoryFile {
                    file_name: "C:\\F\\plain.txt".to_string(),
                    file_size: 3,
                },
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_attach_error_leaves_record_untouched() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("$IR0002");
        fs::write(&artifact, b"x").unwrap();
        let rr = dir.path().join("$RR0002");
        fs::create_dir(&rr).unwrap();
        fs::write(rr.join("kept.txt"), b"1").unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", rr.join("gone.txt")).unwrap();

        let mut rec = record("C:\\Users\\a\\Folder");
        let result = attach_directory_files(&mut rec, &artifact);
        assert!(matches!(result, Err(RbinError::Io(_))));
        assert!(rec.directory_files.is_empty());
        assert_eq!(rec.file_name, "C:\\Users\\a\\Folder");
    }
}
