//! `$I` index file parsing.
//!
//! Starting with Windows Vista every deleted item gets a pair of files in
//! `$Recycle.Bin\<SID>\`: `$R<id>` holds the data and `$I<id>` holds the
//! metadata decoded here. Both layouts share a 24-byte header ([`DeletedItemRecord`]
//! fields `format`, `file_size`, `deleted_on`) followed by the original path:
//!
//! | Format | Path encoding |
//! |--------|---------------|
//! | 1 (Vista - 8.1) | UTF-16LE from byte 24 to end of file, NUL-terminated |
//! | 2 (Windows 10+) | `u32` length in code units at byte 24, UTF-16LE from byte 28 |
//!
//! Parsing is pure. Listing the `$RR` companion directory of a deleted folder
//! is done afterwards by [`crate::recyclebin::companion`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::recyclebin::bytes::{read_i32, read_i64, read_utf16_string};
use crate::recyclebin::constants::*;
use crate::recyclebin::filetime::filetime_to_datetime;
use crate::RbinError;

/// `$I` layout version stored in the first 8 bytes of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DollarIFormat {
    /// Format 1: Windows Vista, 7, 8 and 8.1.
    PreWin10,
    /// Format 2: Windows 10 and later.
    Win10,
}

impl DollarIFormat {
    /// Map the on-disk version number to a format, if known.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(DollarIFormat::PreWin10),
            2 => Some(DollarIFormat::Win10),
            _ => None,
        }
    }

    /// On-disk version number.
    pub fn version(self) -> i64 {
        match self {
            DollarIFormat::PreWin10 => 1,
            DollarIFormat::Win10 => 2,
        }
    }

    /// Windows release family that writes this format.
    pub fn os_label(self) -> &'static str {
        match self {
            DollarIFormat::PreWin10 => "Pre-Windows 10",
            DollarIFormat::Win10 => "Windows 10",
        }
    }
}

impl fmt::Display for DollarIFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version(), self.os_label())
    }
}

/// One file found inside the `$RR` companion directory of a deleted folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryFile {
    /// Path of the file as it was before deletion (original folder path
    /// followed by the path relative to the companion directory).
    pub file_name: String,
    /// Current size of the file in the companion directory.
    pub file_size: u64,
}

/// Decoded `$I` file.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedItemRecord {
    /// Layout version. Bytes 0-7.
    pub format: DollarIFormat,
    /// Size of the deleted item, not of the `$I` file. Bytes 8-15.
    pub file_size: i64,
    /// Deletion time. Bytes 16-23 (FILETIME).
    pub deleted_on: DateTime<Utc>,
    /// Original full path of the deleted item.
    pub file_name: String,
    /// Where the `$I` bytes came from.
    pub source_name: String,
    /// Files below the `$RR` companion directory, when the item was a folder.
    pub directory_files: Vec<DirectoryFile>,
}

impl DeletedItemRecord {
    /// Parse a `$I` file from its full contents.
    ///
    /// `source_name` is carried through untouched. The returned record has an
    /// empty `directory_files` list.
    pub fn parse(data: &[u8], source_name: &str) -> Result<Self, RbinError> {
        if data.len() < DOLLAR_I_HEADER_SIZE {
            return Err(RbinError::MalformedArtifact(format!(
                "$I file is {} bytes, header needs {}",
                data.len(),
                DOLLAR_I_HEADER_SIZE
            )));
        }

        let raw_format = read_i64(data, DOLLAR_I_FORMAT)?;
        let format = DollarIFormat::from_i64(raw_format).ok_or_else(|| {
            RbinError::MalformedArtifact(format!("Unknown $I format version {}", raw_format))
        })?;

        let file_size = read_i64(data, DOLLAR_I_FILE_SIZE)?;

        let raw_deleted_on = read_i64(data, DOLLAR_I_DELETED_ON)?;
        let deleted_on = filetime_to_datetime(raw_deleted_on).ok_or_else(|| {
            RbinError::MalformedArtifact(format!(
                "Deletion time {} is not a representable FILETIME",
                raw_deleted_on
            ))
        })?;

        let file_name = match format {
            DollarIFormat::PreWin10 => {
                let units = (data.len() - DOLLAR_I_V1_NAME) / 2;
                read_utf16_string(data, DOLLAR_I_V1_NAME, units)?
            }
            DollarIFormat::Win10 => {
                if data.len() < DOLLAR_I_V2_NAME {
                    return Err(RbinError::MalformedArtifact(format!(
                        "Format 2 $I file is {} bytes, name length field needs {}",
                        data.len(),
                        DOLLAR_I_V2_NAME
                    )));
                }
                let name_len = read_i32(data, DOLLAR_I_V2_NAME_LENGTH)?;
                let units = usize::try_from(name_len).map_err(|_| {
                    RbinError::MalformedArtifact(format!("Negative name length {}", name_len))
                })?;
                read_utf16_string(data, DOLLAR_I_V2_NAME, units)?
            }
        };

        Ok(DeletedItemRecord {
            format,
            file_size,
            deleted_on,
            file_name,
            source_name: source_name.to_string(),
            directory_files: Vec::new(),
        })
    }
}

impl fmt::Display for DeletedItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Source: {}, Format: {}, File size: 0x{:X}, Filename: {}, Deleted on: {}",
            self.source_name,
            self.format,
            self.file_size,
            self.file_name,
            self.deleted_on.format("%Y/%m/%d %H:%M:%S%.6f")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recyclebin::filetime::datetime_to_filetime;
    use byteorder::{ByteOrder, LittleEndian};

    const DELETED_FT: i64 = 131_783_955_951_234_567;

    fn utf16le(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn make_header(format: i64, size: i64, filetime: i64) -> Vec<u8> {
        let mut buf = vec![0u8; DOLLAR_I_HEADER_SIZE];
        LittleEndian::write_i64(&mut buf[DOLLAR_I_FORMAT..], format);
        LittleEndian::write_i64(&mut buf[DOLLAR_I_FILE_SIZE..], size);
        LittleEndian::write_i64(&mut buf[DOLLAR_I_DELETED_ON..], filetime);
        buf
    }

    fn make_v1(size: i64, filetime: i64, name: &str) -> Vec<u8> {
        let mut buf = make_header(1, size, filetime);
        buf.extend_from_slice(&utf16le(name));
        // Windows pads format 1 paths to MAX_PATH units
        buf.resize(DOLLAR_I_V1_NAME + 520, 0);
        buf
    }

    fn make_v2(size: i64, filetime: i64, name: &str, name_len: i32) -> Vec<u8> {
        let mut buf = make_header(2, size, filetime);
        let mut len = [0u8; 4];
        LittleEndian::write_i32(&mut len, name_len);
        buf.extend_from_slice(&len);
        buf.extend_from_slice(&utf16le(name));
        buf
    }

    #[test]
    fn test_parse_format1() {
        let data = make_v1(0x2A00, DELETED_FT, "C:\\Users\\nfury\\Desktop\\plans.docx");
        let rec = DeletedItemRecord::parse(&data, "$IXYZ123.docx").unwrap();
        assert_eq!(rec.format, DollarIFormat::PreWin10);
        assert_eq!(rec.file_size, 0x2A00);
        assert_eq!(rec.file_name, "C:\\Users\\nfury\\Desktop\\plans.docx");
        assert_eq!(rec.source_name, "$IXYZ123.docx");
        assert_eq!(datetime_to_filetime(&rec.deleted_on), DELETED_FT);
        assert!(rec.directory_files.is_empty());
    }

    #[test]
    fn test_parse_format1_odd_trailing_byte() {
        let mut data = make_header(1, 1, DELETED_FT);
        data.extend_from_slice(&utf16le("a.txt"));
        data.push(0x41);
        let rec = DeletedItemRecord::parse(&data, "x").unwrap();
        assert_eq!(rec.file_name, "a.txt");
    }

    #[test]
    fn test_parse_format1_header_only() {
        let data = make_header(1, 10, DELETED_FT);
        let rec = DeletedItemRecord::parse(&data, "x").unwrap();
        assert_eq!(rec.file_name, "");
    }

    #[test]
    fn test_parse_format2() {
        let mut name = String::from("hello");
        name.push('\0');
        let data = make_v2(4096, DELETED_FT, &name, 6);
        let rec = DeletedItemRecord::parse(&data, "$IHELLO").unwrap();
        assert_eq!(rec.format, DollarIFormat::Win10);
        assert_eq!(rec.file_size, 4096);
        assert_eq!(rec.file_name, "hello");
    }

    #[test]
    fn test_parse_format2_uses_length_field() {
        let data = make_v2(1, DELETED_FT, "C:\\data\\report.pdf-trailing", 18);
        let rec = DeletedItemRecord::parse(&data, "x").unwrap();
        assert_eq!(rec.file_name, "C:\\data\\report.pdf");
        assert_eq!(rec.file_name.encode_utf16().count(), 18);
    }

    #[test]
    fn test_parse_format2_embedded_nul() {
        let data = make_v2(1, DELETED_FT, "ab\0cd", 5);
        let rec = DeletedItemRecord::parse(&data, "x").unwrap();
        assert_eq!(rec.file_name, "ab");
    }

    #[test]
    fn test_parse_format2_length_past_end() {
        let data = make_v2(1, DELETED_FT, "abc", 50);
        assert!(matches!(
            DeletedItemRecord::parse(&data, "x"),
            Err(RbinError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_format2_negative_length() {
        let data = make_v2(1, DELETED_FT, "abc", -1);
        assert!(matches!(
            DeletedItemRecord::parse(&data, "x"),
            Err(RbinError::MalformedArtifact(_))
        ));
    }

    #[test]
    fn test_parse_format2_missing_length() {
        let data = make_header(2, 1, DELETED_FT);
        assert!(matches!(
            DeletedItemRecord::parse(&data, "x"),
            Err(RbinError::MalformedArtifact(_))
        ));
    }

    #[test]
    fn test_parse_too_short() {
        let data = vec![1u8; 23];
        assert!(matches!(
            DeletedItemRecord::parse(&data, "x"),
            Err(RbinError::MalformedArtifact(_))
        ));
    }

    #[test]
    fn test_parse_unknown_format() {
        let data = make_header(3, 1, DELETED_FT);
        let err = DeletedItemRecord::parse(&data, "x").unwrap_err();
        assert!(err.to_string().contains("format version 3"));
    }

    #[test]
    fn test_display() {
        let data = make_v2(255, DELETED_FT, "C:\\a.txt", 8);
        let rec = DeletedItemRecord::parse(&data, "$IA").unwrap();
        let text = rec.to_string();
        assert!(text.contains("Format: 2 (Windows 10)"));
        assert!(text.contains("File size: 0xFF"));
        assert!(text.contains("Deleted on: 2018/08/10 17:26:35.123456"));
    }
}
