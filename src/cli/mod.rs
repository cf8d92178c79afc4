//! CLI subcommand implementations for the `rbcmd` binary.
//!
//! CLI argument parsing uses clap derive macros, with the top-level
//! [`app::Cli`] struct and [`app::Commands`] enum defined in [`app`] and
//! shared between `main.rs` and `build.rs` (for man page generation) via
//! `include!()`.
//!
//! Each subcommand module follows the same pattern: an `Options` struct holding
//! the parsed arguments and a `pub fn execute(opts, writer) -> Result<(), RbinError>`
//! entry point. The `writer: &mut dyn Write` parameter allows output to be
//! captured in tests or redirected to a file via the global `--output` flag.
//!
//! # Subcommands
//!
//! | Command | Module | Purpose |
//! |---------|--------|---------|
//! | `rbcmd parse` | [`parse`] | Decode one `$I` or `INFO2` file |
//! | `rbcmd scan` | [`scan`] | Recursively find and decode every artifact below a directory |
//!
//! Both share the pipeline in [`report`]: parallel decoding, `$RR` companion
//! listing, text or `--json` output, and `--csv` export.
//!
//! Diagnostics (unreadable directories, unsupported headers, companion
//! listing errors) go through `tracing` to stderr; report output goes to the
//! writer. The `wprintln!` macro wraps `writeln!` to convert `io::Error`
//! into `RbinError`.

pub mod app;
pub mod parse;
pub mod report;
pub mod scan;

/// Write a line to the given writer, converting io::Error to RbinError.
macro_rules! wprintln {
    ($w:expr) => {
        writeln!($w).map_err(|e| $crate::RbinError::Io(e.to_string()))
    };
    ($w:expr, $($arg:tt)*) => {
        writeln!($w, $($arg)*).map_err(|e| $crate::RbinError::Io(e.to_string()))
    };
}

pub(crate) use wprintln;

/// CSV-escape a string per RFC 4180.
///
/// Strings containing commas, double quotes, or newlines are quoted and
/// internal double quotes are doubled.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
