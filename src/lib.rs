//! Windows Recycle Bin artifact analysis toolkit.
//!
//! The `recyclebin-utils` crate (library name `rbin`) provides Rust types and
//! functions for decoding the metadata files the Windows Recycle Bin leaves
//! behind for deleted items: the per-item `$I` index files written by Vista
//! and later (both the pre-Windows 10 and the Windows 10 layout), and the
//! legacy `INFO2` database used by Windows XP and earlier.
//!
//! # CLI Reference
//!
//! Install the `rbcmd` binary and use its subcommands to work with recycle
//! bin artifacts from the command line.
//!
//! ```text
//! cargo install recyclebin-utils
//! ```
//!
//! ## Subcommands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | [`rbcmd parse`](cli::app::Commands::Parse) | Decode a single `$I` or `INFO2` file |
//! | [`rbcmd scan`](cli::app::Commands::Scan) | Find and decode every artifact below a directory |
//! | [`rbcmd completions`](cli::app::Commands::Completions) | Generate shell completion scripts |
//!
//! ## Global options
//!
//! All subcommands accept `--color <auto|always|never>`, `--output <file>`,
//! `--threads <n>` and the `--debug` / `--trace` logging switches. Both
//! decoding subcommands accept `--csv <dir>` for CSV export and `--json` for
//! machine-readable output.
//!
//! # Library API
//!
//! ```toml
//! [dependencies]
//! rbin = { package = "recyclebin-utils", version = "1" }
//! ```
//!
//! ## Quick example
//!
//! ```no_run
//! use rbin::recyclebin::artifact::Artifact;
//!
//! let path = r"C:\$Recycle.Bin\S-1-5-21-1000\$IABC123.txt";
//! let data = std::fs::read(path).unwrap();
//! let artifact = Artifact::decode(&data, path).unwrap();
//! for row in artifact.rows() {
//!     println!("{} {} {}", row.file_type, row.file_name, row.deleted_on);
//! }
//! ```
//!
//! ## Key entry points
//!
//! | Type / Function | Purpose |
//! |-----------------|---------|
//! | [`Artifact`](recyclebin::artifact::Artifact) | Detect the artifact family and decode it |
//! | [`DeletedItemRecord`](recyclebin::dollar_i::DeletedItemRecord) | Decoded `$I` file |
//! | [`Info2Database`](recyclebin::info2::Info2Database) | Decoded `INFO2` database |
//! | [`attach_directory_files`](recyclebin::companion::attach_directory_files) | Enumerate the `$RR` companion directory of a deleted folder |
//! | [`find_recycle_bin_files`](util::fs::find_recycle_bin_files) | Locate candidate artifacts below a directory |
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | on | Builds the `rbcmd` binary and the [`cli`] module (clap, colored, rayon, tracing-subscriber). |

#[cfg(feature = "cli")]
pub mod cli;
pub mod recyclebin;
pub mod util;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

use thiserror::Error;

/// Errors returned by `rbin` operations.
#[derive(Error, Debug)]
pub enum RbinError {
    /// An I/O error occurred (file open, read, or write failure).
    #[error("I/O error: {0}")]
    Io(String),

    /// The buffer belongs to a known artifact family but cannot be decoded
    /// (too short for its header, unknown version tag, impossible values).
    #[error("Malformed artifact: {0}")]
    MalformedArtifact(String),

    /// The leading byte of the buffer matches no known artifact family.
    #[error("Unrecognized artifact format: leading byte 0x{0:02X}")]
    UnrecognizedFormat(u8),

    /// A field read reached past the end of the buffer.
    #[error("Read of {len} bytes at offset {offset} exceeds buffer of {available} bytes")]
    OutOfRange {
        offset: usize,
        len: usize,
        available: usize,
    },

    /// An invalid argument was supplied (missing file, bad option, etc.).
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Structured output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
