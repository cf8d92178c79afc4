use std::io::Write;
use std::path::Path;

use crate::cli::report::{self, ReportOptions};
use crate::cli::wprintln;
use crate::util::fs::find_recycle_bin_files;
use crate::RbinError;

/// Options for the scan subcommand.
pub struct ScanOptions {
    /// Directory to search.
    pub dir: String,
    /// Report and export settings.
    pub report: ReportOptions,
}

/// Find every `INFO2` and `$I*` file below a directory and decode them all.
///
/// Discovery walks the tree without following symbolic links, skipping
/// unreadable subdirectories. Files are decoded in parallel; the summary
/// reports how many decoded successfully and lists the ones that did not.
pub fn execute(opts: &ScanOptions, writer: &mut dyn Write) -> Result<(), RbinError> {
    let dir = Path::new(&opts.dir);
    if !dir.is_dir() {
        return Err(RbinError::Argument(format!(
            "Directory '{}' not found",
            opts.dir
        )));
    }

    let files = find_recycle_bin_files(dir)?;
    tracing::info!("Found {} candidate files in '{}'", files.len(), opts.dir);

    if files.is_empty() && !opts.report.json {
        wprintln!(writer, "No $I or INFO2 files found in {}", opts.dir)?;
        return Ok(());
    }

    report::run(&files, &opts.report, writer)
}
