//! Artifact family detection and uniform output rows.
//!
//! The first byte of a recycle bin metadata file tells the families apart:
//! `$I` files start with their 64-bit format version (1 or 2), `INFO2`
//! databases with their 32-bit version (5). [`Artifact::decode`] picks the
//! decoder from that byte, and [`Artifact::rows`] flattens either result into
//! [`ArtifactRow`]s for display and export.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::recyclebin::constants::*;
use crate::recyclebin::dollar_i::DeletedItemRecord;
use crate::recyclebin::info2::Info2Database;
use crate::RbinError;

/// Recycle bin artifact family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    /// `$I` index file (Vista and later).
    #[serde(rename = "$I")]
    DollarI,
    /// `INFO2` database (Windows XP and earlier).
    #[serde(rename = "INFO2")]
    Info2,
}

impl ArtifactKind {
    /// Identify the artifact family from the leading byte of `data`.
    pub fn detect(data: &[u8]) -> Result<Self, RbinError> {
        match data.first() {
            None => Err(RbinError::MalformedArtifact("File is empty".to_string())),
            Some(&DISCRIMINATOR_DOLLAR_I_PRE_WIN10) | Some(&DISCRIMINATOR_DOLLAR_I_WIN10) => {
                Ok(ArtifactKind::DollarI)
            }
            Some(&DISCRIMINATOR_INFO2) => Ok(ArtifactKind::Info2),
            Some(&other) => Err(RbinError::UnrecognizedFormat(other)),
        }
    }

    /// Short label used in reports and CSV output.
    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::DollarI => "$I",
            ArtifactKind::Info2 => "INFO2",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded artifact of either family.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Artifact {
    #[serde(rename = "$I")]
    DollarI(DeletedItemRecord),
    #[serde(rename = "INFO2")]
    Info2(Info2Database),
}

impl Artifact {
    /// Detect the family of `data` and decode it.
    ///
    /// This never touches the filesystem; `$I` companion directories are
    /// listed separately with
    /// [`attach_directory_files`](crate::recyclebin::companion::attach_directory_files).
    pub fn decode(data: &[u8], source_name: &str) -> Result<Self, RbinError> {
        match ArtifactKind::detect(data)? {
            ArtifactKind::DollarI => Ok(Artifact::DollarI(DeletedItemRecord::parse(
                data,
                source_name,
            )?)),
            ArtifactKind::Info2 => Ok(Artifact::Info2(Info2Database::parse(data, source_name)?)),
        }
    }

    /// Family of this artifact.
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::DollarI(_) => ArtifactKind::DollarI,
            Artifact::Info2(_) => ArtifactKind::Info2,
        }
    }

    /// Where the artifact bytes came from.
    pub fn source_name(&self) -> &str {
        match self {
            Artifact::DollarI(rec) => &rec.source_name,
            Artifact::Info2(db) => &db.source_name,
        }
    }

    /// Flatten into output rows.
    ///
    /// A `$I` record yields one row for itself followed by one row per
    /// companion-directory file, all sharing its deletion time. An `INFO2`
    /// database yields one row per record, named by
    /// [`FileRecord::display_name`](crate::recyclebin::info2::FileRecord::display_name).
    pub fn rows(&self) -> Vec<ArtifactRow> {
        match self {
            Artifact::DollarI(rec) => {
                let mut rows = Vec::with_capacity(1 + rec.directory_files.len());
                rows.push(ArtifactRow {
                    file_type: ArtifactKind::DollarI,
                    file_name: rec.file_name.clone(),
                    file_size: rec.file_size,
                    source_name: rec.source_name.clone(),
                    deleted_on: rec.deleted_on,
                });
                rows.extend(rec.directory_files.iter().map(|f| ArtifactRow {
                    file_type: ArtifactKind::DollarI,
                    file_name: f.file_name.clone(),
                    file_size: i64::try_from(f.file_size).unwrap_or(i64::MAX),
                    source_name: rec.source_name.clone(),
                    deleted_on: rec.deleted_on,
                }));
                rows
            }
            Artifact::Info2(db) => db
                .records
                .iter()
                .map(|r| ArtifactRow {
                    file_type: ArtifactKind::Info2,
                    file_name: r.display_name().to_string(),
                    file_size: i64::from(r.file_size),
                    source_name: db.source_name.clone(),
                    deleted_on: r.deleted_on,
                })
                .collect(),
        }
    }
}

/// One deleted file, independent of the artifact family it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactRow {
    pub file_type: ArtifactKind,
    pub file_name: String,
    pub file_size: i64,
    pub source_name: String,
    pub deleted_on: DateTime<Utc>,
}
