#[cfg(not(feature = "cli"))]
compile_error!("The `rbcmd` binary requires the `cli` feature. Build with `--features cli`.");

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process;

use rbin::cli;
use rbin::cli::app::{Cli, ColorMode, Commands};
use rbin::cli::report::ReportOptions;
use rbin::RbinError;
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool, trace: bool) {
    let filter = if trace {
        EnvFilter::new("trace")
    } else if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.debug, cli.trace);
    tracing::debug!("Command line: {}", std::env::args().skip(1).collect::<Vec<_>>().join(" "));

    // Configure rayon thread pool if --threads was specified
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok(); // Ignore if already initialized
    }

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {} // colored auto-detects tty
    }

    let writer_result: Result<Box<dyn Write>, RbinError> = match &cli.output {
        Some(path) => File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| RbinError::Io(format!("Cannot create {}: {}", path, e))),
        None => Ok(Box::new(std::io::stdout()) as Box<dyn Write>),
    };

    let mut writer = match writer_result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Parse {
            file,
            csv,
            csvf,
            json,
            quiet,
            datetime_format,
        } => cli::parse::execute(
            &cli::parse::ParseOptions {
                file,
                report: ReportOptions {
                    csv,
                    csvf,
                    json,
                    quiet,
                    datetime_format,
                },
            },
            &mut writer,
        ),

        Commands::Scan {
            dir,
            csv,
            csvf,
            json,
            quiet,
            datetime_format,
        } => cli::scan::execute(
            &cli::scan::ScanOptions {
                dir,
                report: ReportOptions {
                    csv,
                    csvf,
                    json,
                    quiet,
                    datetime_format,
                },
            },
            &mut writer,
        ),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "rbcmd", &mut std::io::stdout());
            Ok(())
        }
    };

    let _ = writer.flush();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
