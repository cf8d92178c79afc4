use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "rbcmd")]
#[command(about = "Windows Recycle Bin artifact analysis toolkit ($I and INFO2)")]
#[command(version)]
pub struct Cli {
    /// Control colored output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Number of threads for parallel decoding (0 = auto)
    #[arg(long, default_value = "0", global = true)]
    pub threads: usize,

    /// Show debug messages
    #[arg(long, global = true)]
    pub debug: bool,

    /// Show trace messages
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a single $I or INFO2 file
    Parse {
        /// Path to the artifact ($I... or INFO2)
        #[arg(short, long)]
        file: String,

        /// Directory to save CSV formatted results to
        #[arg(long)]
        csv: Option<String>,

        /// File name to save CSV formatted results to (overrides default name)
        #[arg(long)]
        csvf: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Only show the summary (no per-record details)
        #[arg(short, long)]
        quiet: bool,

        /// Date/time format for deletion timestamps (strftime, UTC)
        // Literal because build.rs includes this file; mirrors util::format::DEFAULT_DATETIME_FORMAT
        #[arg(long = "dt", default_value = "%Y-%m-%d %H:%M:%S")]
        datetime_format: String,
    },

    /// Find and decode every $I and INFO2 file below a directory
    Scan {
        /// Directory to search recursively
        #[arg(short, long)]
        dir: String,

        /// Directory to save CSV formatted results to
        #[arg(long)]
        csv: Option<String>,

        /// File name to save CSV formatted results to (overrides default name)
        #[arg(long)]
        csvf: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Only show the summary (no per-record details)
        #[arg(short, long)]
        quiet: bool,

        /// Date/time format for deletion timestamps (strftime, UTC)
        // Literal because build.rs includes this file; mirrors util::format::DEFAULT_DATETIME_FORMAT
        #[arg(long = "dt", default_value = "%Y-%m-%d %H:%M:%S")]
        datetime_format: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
