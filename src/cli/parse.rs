use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::report::{self, ReportOptions};
use crate::RbinError;

/// Options for the parse subcommand.
pub struct ParseOptions {
    /// Path to a `$I` or `INFO2` file.
    pub file: String,
    /// Report and export settings.
    pub report: ReportOptions,
}

/// Decode one recycle bin artifact and report its records.
///
/// The file family is picked from its first byte: `$I` files (format 1 or
/// 2) print the original path, size and deletion time, plus any files found
/// in the matching `$RR` directory; `INFO2` databases print every record.
/// A file that cannot be decoded is reported as failed in the summary rather
/// than returned as an error.
pub fn execute(opts: &ParseOptions, writer: &mut dyn Write) -> Result<(), RbinError> {
    let path = Path::new(&opts.file);
    if !path.is_file() {
        return Err(RbinError::Argument(format!(
            "File '{}' not found",
            opts.file
        )));
    }

    let files: Vec<PathBuf> = vec![path.to_path_buf()];
    report::run(&files, &opts.report, writer)
}
