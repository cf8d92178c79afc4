//! `INFO2` database parsing.
//!
//! Windows 95 through XP keep one `INFO2` file per user in
//! `RECYCLER\<SID>\` (or `RECYCLED\`). It starts with a 20-byte header
//! ([`Info2Header`]) followed by fixed 800-byte records ([`FileRecord`]),
//! one per deleted file, in deletion order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::recyclebin::bytes::{read_ansi_string, read_i32, read_i64, read_utf16_string};
use crate::recyclebin::constants::*;
use crate::recyclebin::filetime::filetime_to_datetime;
use crate::RbinError;

/// Parsed `INFO2` header (20 bytes).
#[derive(Debug, Clone, Serialize)]
pub struct Info2Header {
    /// Format version (5 on Windows XP). Bytes 0-3.
    pub version: i32,
    /// Unknown. Bytes 4-7.
    pub unknown1: i32,
    /// Unknown. Bytes 8-11.
    pub unknown2: i32,
    /// Size of each file record. Bytes 12-15.
    pub file_entry_size: i32,
    /// Unknown. Bytes 16-19.
    pub unknown3: i32,
}

impl Info2Header {
    /// Parse the header from the start of an `INFO2` buffer.
    pub fn parse(data: &[u8]) -> Result<Self, RbinError> {
        if data.len() < INFO2_HEADER_SIZE {
            return Err(RbinError::MalformedArtifact(format!(
                "INFO2 file is {} bytes, header needs {}",
                data.len(),
                INFO2_HEADER_SIZE
            )));
        }

        Ok(Info2Header {
            version: read_i32(data, INFO2_VERSION)?,
            unknown1: read_i32(data, INFO2_UNKNOWN1)?,
            unknown2: read_i32(data, INFO2_UNKNOWN2)?,
            file_entry_size: read_i32(data, INFO2_FILE_ENTRY_SIZE)?,
            unknown3: read_i32(data, INFO2_UNKNOWN3)?,
        })
    }

    /// Returns true if the header's record size matches the 800-byte stride
    /// the parser slices records with.
    pub fn has_expected_stride(&self) -> bool {
        usize::try_from(self.file_entry_size).is_ok_and(|size| size == INFO2_RECORD_SIZE)
    }
}

/// One deleted file listed in an `INFO2` database.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Deletion index; the data file is renamed to `D<drive letter><index>`.
    pub index: i32,
    /// Drive the file was deleted from (0 = A:, 2 = C:).
    pub drive_number: i32,
    /// Original path in the system ANSI code page.
    pub file_name_ascii: String,
    /// Original path in UTF-16; empty when the slot was zeroed.
    pub file_name_unicode: String,
    /// Deletion time.
    pub deleted_on: DateTime<Utc>,
    /// Size of the deleted file.
    pub file_size: i32,
}

impl FileRecord {
    /// Parse a single record slice.
    ///
    /// The Unicode name is only read when the slice extends past the
    /// fixed-width fields; a shorter slice yields an empty Unicode name.
    pub fn parse(record: &[u8]) -> Result<Self, RbinError> {
        let file_name_unicode = if record.len() > INFO2_REC_UNICODE_NAME {
            let available = (record.len() - INFO2_REC_UNICODE_NAME) / 2;
            read_utf16_string(
                record,
                INFO2_REC_UNICODE_NAME,
                available.min(INFO2_REC_UNICODE_NAME_UNITS),
            )?
        } else {
            String::new()
        };

        let raw_deleted_on = read_i64(record, INFO2_REC_DELETED_ON)?;
        let deleted_on = filetime_to_datetime(raw_deleted_on).ok_or_else(|| {
            RbinError::MalformedArtifact(format!(
                "Deletion time {} is not a representable FILETIME",
                raw_deleted_on
            ))
        })?;

        Ok(FileRecord {
            index: read_i32(record, INFO2_REC_INDEX)?,
            drive_number: read_i32(record, INFO2_REC_DRIVE)?,
            file_name_ascii: read_ansi_string(
                record,
                INFO2_REC_ASCII_NAME,
                INFO2_REC_ASCII_NAME_LEN,
            )?,
            file_name_unicode,
            deleted_on,
            file_size: read_i32(record, INFO2_REC_FILE_SIZE)?,
        })
    }

    /// Name to show for this record: the Unicode name unless it is empty.
    pub fn display_name(&self) -> &str {
        if self.file_name_unicode.is_empty() {
            &self.file_name_ascii
        } else {
            &self.file_name_unicode
        }
    }

    /// Drive letter for `drive_number`, if it is in `A..=Z`.
    pub fn drive_letter(&self) -> Option<char> {
        u8::try_from(self.drive_number)
            .ok()
            .filter(|n| *n < 26)
            .map(|n| char::from(b'A' + n))
    }
}

/// Decoded `INFO2` database.
#[derive(Debug, Clone, Serialize)]
pub struct Info2Database {
    /// Database header.
    pub header: Info2Header,
    /// Where the `INFO2` bytes came from.
    pub source_name: String,
    /// File records in on-disk order.
    pub records: Vec<FileRecord>,
}

impl Info2Database {
    /// Parse an `INFO2` database from its full contents.
    ///
    /// Records are sliced at a fixed 800-byte stride regardless of the
    /// header's `file_entry_size`. A trailing slice shorter than 800 bytes
    /// is ignored.
    pub fn parse(data: &[u8], source_name: &str) -> Result<Self, RbinError> {
        let header = Info2Header::parse(data)?;

        if !header.has_expected_stride() {
            tracing::debug!(
                "{}: header record size {} differs from {}, using {}",
                source_name,
                header.file_entry_size,
                INFO2_RECORD_SIZE,
                INFO2_RECORD_SIZE
            );
        }

        let body = &data[INFO2_HEADER_SIZE..];
        let chunks = body.chunks_exact(INFO2_RECORD_SIZE);
        let trailing = chunks.remainder().len();

        let records = chunks
            .map(FileRecord::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if trailing > 0 {
            tracing::debug!(
                "{}: ignoring {} trailing bytes after {} records",
                source_name,
                trailing,
                records.len()
            );
        }

        Ok(Info2Database {
            header,
            source_name: source_name.to_string(),
            records,
        })
    }
}
