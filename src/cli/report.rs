//! Shared decode-and-report pipeline for `rbcmd parse` and `rbcmd scan`.
//!
//! Every candidate file is read, its family detected and decoded in
//! parallel (one outcome per file, merged in input order). `$I` records are
//! then enriched with their `$RR` companion directory. Results are written as
//! a text report or JSON, followed optionally by a CSV export of all rows.
//! A file that fails to decode is listed in the summary and never stops the
//! rest of the batch.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;

use crate::cli::{csv_escape, wprintln};
use crate::recyclebin::artifact::{Artifact, ArtifactRow};
use crate::recyclebin::companion::attach_directory_files;
use crate::recyclebin::dollar_i::DeletedItemRecord;
use crate::recyclebin::info2::Info2Database;
use crate::util::format::{format_size, format_timestamp, validate_datetime_format};
use crate::RbinError;

/// CSV header, in column order.
pub const CSV_HEADER: &str = "SourceName,FileType,FileName,FileSize,DeletedOn";

/// Output settings shared by the decoding subcommands.
pub struct ReportOptions {
    /// Directory to write the CSV export to.
    pub csv: Option<String>,
    /// File name for the CSV export, replacing the timestamped default.
    pub csvf: Option<String>,
    /// Emit a JSON report instead of text.
    pub json: bool,
    /// Suppress per-artifact details in the text report.
    pub quiet: bool,
    /// strftime pattern for deletion times.
    pub datetime_format: String,
}

/// Result of processing one file.
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Artifact, RbinError>,
}

#[derive(Serialize)]
struct FailedFileJson {
    file: String,
    error: String,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    total_files: usize,
    processed_files: usize,
    artifacts: Vec<&'a Artifact>,
    rows: Vec<RowJson>,
    failed: Vec<FailedFileJson>,
}

#[derive(Serialize)]
struct RowJson {
    #[serde(flatten)]
    row: ArtifactRow,
    deleted_on_formatted: String,
}

/// Read, decode and enrich one artifact file.
///
/// Companion directory errors are logged and leave the record without
/// `directory_files`; they do not fail the file.
pub fn decode_file(path: &Path) -> Result<Artifact, RbinError> {
    let data = fs::read(path)
        .map_err(|e| RbinError::Io(format!("Cannot read {}: {}", path.display(), e)))?;
    let source_name = path.to_string_lossy();

    let mut artifact = Artifact::decode(&data, &source_name)?;

    if let Artifact::DollarI(ref mut record) = artifact {
        if let Err(e) = attach_directory_files(record, path) {
            tracing::warn!(
                "Cannot list companion directory for '{}': {}",
                path.display(),
                e
            );
        }
    }

    Ok(artifact)
}

/// Decode every file in parallel, keeping input order.
pub fn decode_files(files: &[PathBuf]) -> Vec<FileOutcome> {
    files
        .par_iter()
        .map(|path| {
            tracing::debug!("Processing '{}'", path.display());
            FileOutcome {
                path: path.clone(),
                result: decode_file(path),
            }
        })
        .collect()
}

/// Decode `files` and write the report for them.
pub fn run(
    files: &[PathBuf],
    opts: &ReportOptions,
    writer: &mut dyn Write,
) -> Result<(), RbinError> {
    validate_datetime_format(&opts.datetime_format)?;

    let start = Instant::now();
    let outcomes = decode_files(files);
    let elapsed = start.elapsed();

    let mut artifacts: Vec<&Artifact> = Vec::new();
    let mut failed: Vec<(&Path, &RbinError)> = Vec::new();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(artifact) => artifacts.push(artifact),
            Err(e) => {
                log_failure(&outcome.path, e);
                failed.push((outcome.path.as_path(), e));
            }
        }
    }

    let rows: Vec<ArtifactRow> = artifacts.iter().flat_map(|a| a.rows()).collect();

    if opts.json {
        let row_json = rows
            .iter()
            .map(|row| {
                let deleted_on_formatted =
                    format_timestamp(&row.deleted_on, &opts.datetime_format)?;
                Ok(RowJson {
                    row: row.clone(),
                    deleted_on_formatted,
                })
            })
            .collect::<Result<Vec<_>, RbinError>>()?;
        let report = ReportJson {
            total_files: files.len(),
            processed_files: artifacts.len(),
            artifacts: artifacts.clone(),
            rows: row_json,
            failed: failed
                .iter()
                .map(|(path, e)| FailedFileJson {
                    file: path.display().to_string(),
                    error: e.to_string(),
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| RbinError::Serialization(format!("JSON serialization error: {}", e)))?;
        wprintln!(writer, "{}", json)?;
    } else {
        if !opts.quiet {
            for artifact in &artifacts {
                match artifact {
                    Artifact::DollarI(record) => {
                        print_dollar_i(writer, record, &opts.datetime_format)?
                    }
                    Artifact::Info2(db) => print_info2(writer, db, &opts.datetime_format)?,
                }
                wprintln!(writer)?;
            }
        }

        wprintln!(
            writer,
            "Processed {} out of {} files in {:.4} seconds",
            artifacts.len(),
            files.len(),
            elapsed.as_secs_f64()
        )?;

        if !failed.is_empty() {
            wprintln!(writer)?;
            wprintln!(writer, "{}", "Failed files".yellow())?;
            for (path, _) in &failed {
                wprintln!(writer, "  {}", path.display())?;
            }
        }
    }

    if let Some(ref csv_dir) = opts.csv {
        if !files.is_empty() {
            export_csv(Path::new(csv_dir), opts, &rows, writer)?;
        }
    }

    Ok(())
}

/// Write the CSV export. Only errors on `writer` are returned; a CSV
/// directory or file that cannot be created is logged and skipped.
fn export_csv(
    csv_dir: &Path,
    opts: &ReportOptions,
    rows: &[ArtifactRow],
    writer: &mut dyn Write,
) -> Result<(), RbinError> {
    let out_path = match csv_output_path(csv_dir, opts.csvf.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            tracing::error!(
                "Unable to use '{}' for CSV output. CSV export canceled. Error: {}",
                csv_dir.display(),
                e
            );
            return Ok(());
        }
    };

    if !opts.json {
        wprintln!(writer)?;
        wprintln!(
            writer,
            "CSV output will be saved to '{}'",
            out_path.display()
        )?;
    }
    if let Err(e) = write_csv(&out_path, rows, &opts.datetime_format) {
        tracing::error!(
            "Unable to write '{}'. CSV export canceled. Error: {}",
            out_path.display(),
            e
        );
    }

    Ok(())
}

fn log_failure(path: &Path, err: &RbinError) {
    match err {
        RbinError::UnrecognizedFormat(byte) => tracing::warn!(
            "Unknown header '0x{:X}' in '{}', format not supported",
            byte,
            path.display()
        ),
        _ => tracing::error!("Error processing file '{}': {}", path.display(), err),
    }
}

fn print_dollar_i(
    writer: &mut dyn Write,
    record: &DeletedItemRecord,
    datetime_format: &str,
) -> Result<(), RbinError> {
    wprintln!(
        writer,
        "{}",
        format!("Source file: {}", record.source_name).yellow()
    )?;
    wprintln!(writer)?;
    wprintln!(writer, "Version: {}", record.format)?;
    wprintln!(
        writer,
        "File size: {} ({})",
        record.file_size,
        format_size(record.file_size)
    )?;
    wprintln!(writer, "File name: {}", record.file_name)?;
    wprintln!(
        writer,
        "Deleted on: {}",
        format_timestamp(&record.deleted_on, datetime_format)?.red()
    )?;

    if !record.directory_files.is_empty() {
        wprintln!(writer)?;
        wprintln!(
            writer,
            "{}",
            format!("Subfiles in '{}'", record.file_name).yellow()
        )?;
        for file in &record.directory_files {
            let size = i64::try_from(file.file_size).unwrap_or(i64::MAX);
            wprintln!(
                writer,
                "File name: {} Size: {} ({})",
                file.file_name,
                file.file_size,
                format_size(size)
            )?;
        }
    }

    Ok(())
}

fn print_info2(
    writer: &mut dyn Write,
    db: &Info2Database,
    datetime_format: &str,
) -> Result<(), RbinError> {
    wprintln!(
        writer,
        "{}",
        format!("Source file: {}", db.source_name).yellow()
    )?;
    wprintln!(writer)?;
    wprintln!(writer, "Version: {}", db.header.version)?;
    wprintln!(writer)?;
    wprintln!(writer, "{}", "File records".yellow())?;

    for record in &db.records {
        wprintln!(writer, "Index: {}", record.index)?;
        match record.drive_letter() {
            Some(letter) => wprintln!(writer, "Drive #: {} ({}:)", record.drive_number, letter)?,
            None => wprintln!(writer, "Drive #: {}", record.drive_number)?,
        }
        wprintln!(
            writer,
            "File size: {} ({})",
            record.file_size,
            format_size(i64::from(record.file_size))
        )?;
        wprintln!(writer, "File name: {}", record.display_name())?;
        wprintln!(
            writer,
            "Deleted on: {}",
            format_timestamp(&record.deleted_on, datetime_format)?.red()
        )?;
        wprintln!(writer)?;
    }

    Ok(())
}

/// Resolve the CSV export path, creating `csv_dir` if needed.
///
/// Only the file-name component of `csvf` is used. Without `csvf` the name is
/// `<local yyyyMMddHHmmss>_RBCmd_Output.csv`.
pub fn csv_output_path(csv_dir: &Path, csvf: Option<&str>) -> Result<PathBuf, RbinError> {
    if !csv_dir.is_dir() {
        tracing::warn!("'{}' does not exist. Creating...", csv_dir.display());
        fs::create_dir_all(csv_dir).map_err(|e| {
            RbinError::Io(format!("Cannot create {}: {}", csv_dir.display(), e))
        })?;
    }

    let name = match csvf.and_then(|f| Path::new(f).file_name()) {
        Some(name) => name.to_string_lossy().into_owned(),
        None => format!("{}_RBCmd_Output.csv", Local::now().format("%Y%m%d%H%M%S")),
    };

    Ok(csv_dir.join(name))
}

/// Write `rows` as CSV to `path`.
pub fn write_csv(
    path: &Path,
    rows: &[ArtifactRow],
    datetime_format: &str,
) -> Result<(), RbinError> {
    let file = File::create(path)
        .map_err(|e| RbinError::Io(format!("Cannot create {}: {}", path.display(), e)))?;
    let mut out = BufWriter::new(file);

    wprintln!(out, "{}", CSV_HEADER)?;
    for row in rows {
        wprintln!(
            out,
            "{},{},{},{},{}",
            csv_escape(&row.source_name),
            row.file_type,
            csv_escape(&row.file_name),
            row.file_size,
            csv_escape(&format_timestamp(&row.deleted_on, datetime_format)?)
        )?;
    }

    out.flush()
        .map_err(|e| RbinError::Io(format!("Cannot write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recyclebin::artifact::ArtifactKind;
    use crate::recyclebin::constants::*;
    use crate::util::format::DEFAULT_DATETIME_FORMAT;
    use byteorder::{ByteOrder, LittleEndian};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn row(name: &str) -> ArtifactRow {
        ArtifactRow {
            file_type: ArtifactKind::Info2,
            file_name: name.to_string(),
            file_size: 42,
            source_name: "C:\\RECYCLER\\S-1\\INFO2".to_string(),
            deleted_on: Utc.with_ymd_and_hms(2005, 5, 17, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_csv_output_path_default_name() {
        let dir = TempDir::new().unwrap();
        let path = csv_output_path(dir.path(), None).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("_RBCmd_Output.csv"));
        assert_eq!(name.len(), "20240101120000_RBCmd_Output.csv".len());
    }

    #[test]
    fn test_csv_output_path_custom_name_and_create() {
        let dir = TempDir::new().unwrap();
        let csv_dir = dir.path().join("out").join("csv");
        let path = csv_output_path(&csv_dir, Some("/ignored/dir/results.csv")).unwrap();
        assert!(csv_dir.is_dir());
        assert_eq!(path, csv_dir.join("results.csv"));
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(
            &path,
            &[row("C:\\a.txt"), row("C:\\b, c.txt")],
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "C:\\RECYCLER\\S-1\\INFO2,INFO2,C:\\a.txt,42,2005-05-17 09:30:00"
        );
        assert!(lines[2].contains("\"C:\\b, c.txt\""));
    }

    #[test]
    fn test_decode_file_missing() {
        let result = decode_file(Path::new("/nonexistent/$I123"));
        assert!(matches!(result, Err(RbinError::Io(_))));
    }

    fn options(csv: Option<String>) -> ReportOptions {
        ReportOptions {
            csv,
            csvf: None,
            json: false,
            quiet: true,
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }

    fn dollar_i_v2(name: &str) -> Vec<u8> {
        let units: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        let mut buf = vec![0u8; DOLLAR_I_V2_NAME + units.len() * 2];
        LittleEndian::write_i64(&mut buf[DOLLAR_I_FORMAT..], 2);
        LittleEndian::write_i64(&mut buf[DOLLAR_I_FILE_SIZE..], 8192);
        LittleEndian::write_i64(&mut buf[DOLLAR_I_DELETED_ON..], 131_783_955_951_234_567);
        LittleEndian::write_i32(&mut buf[DOLLAR_I_V2_NAME_LENGTH..], units.len() as i32);
        LittleEndian::write_u16_into(&units, &mut buf[DOLLAR_I_V2_NAME..]);
        buf
    }

    #[test]
    fn test_run_csv_dir_is_a_file() {
        let dir = TempDir::new().unwrap();
        let info2 = dir.path().join("INFO2");
        fs::write(&info2, [0x05u8; 20]).unwrap();
        let not_a_dir = dir.path().join("csvout");
        fs::write(&not_a_dir, b"occupied").unwrap();

        let mut out = Vec::new();
        run(
            &[info2],
            &options(Some(not_a_dir.to_string_lossy().into_owned())),
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Processed 1 out of 1 files"));
        assert!(!text.contains("CSV output will be saved"));
        assert_eq!(fs::read(&not_a_dir).unwrap(), b"occupied");
    }

    #[cfg(unix)]
    #[test]
    fn test_decode_file_keeps_record_when_companion_listing_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("$IR5KD0QZ");
        fs::write(&path, dollar_i_v2("C:\\Users\\jdoe\\Photos")).unwrap();
        let rr = dir.path().join("$RR5KD0QZ");
        fs::create_dir(&rr).unwrap();
        fs::write(rr.join("a.jpg"), b"jpg").unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", rr.join("b.jpg")).unwrap();

        match decode_file(&path).unwrap() {
            Artifact::DollarI(rec) => {
                assert_eq!(rec.file_name, "C:\\Users\\jdoe\\Photos");
                assert_eq!(rec.file_size, 8192);
                assert_eq!(rec.source_name, path.to_string_lossy());
                assert!(rec.directory_files.is_empty());
            }
            other => panic!("expected $I artifact, got {:?}", other.kind()),
        }

        let mut out = Vec::new();
        run(&[path], &options(None), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Processed 1 out of 1 files"));
        assert!(!text.contains("Failed files"));
    }

    #[test]
    fn test_decode_files_keeps_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, [0x09u8, 0, 0]).unwrap();
        fs::write(&b, [0x05u8; 20]).unwrap();

        let outcomes = decode_files(&[a.clone(), b.clone()]);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].path, a);
        assert!(matches!(
            outcomes[0].result,
            Err(RbinError::UnrecognizedFormat(0x09))
        ));
        assert_eq!(outcomes[1].path, b);
        assert!(outcomes[1].result.is_ok());
    }
}
