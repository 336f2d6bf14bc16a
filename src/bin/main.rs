//! This is the main entry point for the MBR forensics tool.
//!
//! The program decodes the partition table of a raw disk image, probes the boot
//! sector of one allocated partition and prints the findings to standard output.
//! Without an image argument it looks for `CW Image.dd` in the working directory.

use clap::Parser;
use log::{error, info};
use mbr_forensics::analysis::config::DEFAULT_IMAGE;
use mbr_forensics::analysis::{AnalysisConfig, LazyFile, TeeWriter, analyze};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(version, about = "Partition table and boot sector triage for raw disk images")]
struct Cli {
    /// Path to the raw disk image. Defaults to `CW Image.dd` in the working directory.
    image: Option<PathBuf>,
    /// Allocated partition to probe, counting from 1.
    #[arg(short, long, default_value_t = 2)]
    target: usize,
    /// Also write the report to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Increase log verbosity (-v warnings, -vv info, -vvv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Log fatal errors only, whatever the verbosity.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .module("mbr_forensics")
        .verbosity(log_verbosity(cli.quiet, cli.verbose))
        .init()
    {
        eprintln!("Logger initialisation failed: {e}");
    }

    let Some(config) = AnalysisConfig::with_target(cli.target) else {
        error!("Invalid target: partitions are numbered from 1.");
        return ExitCode::FAILURE;
    };

    let Some(image) = resolve_image(cli.image) else {
        return ExitCode::FAILURE;
    };

    let result = match &cli.output {
        Some(report_path) => {
            info!("Writing report to {}", report_path.display());
            let mut tee = TeeWriter::new(io::stdout().lock(), LazyFile::new(report_path));
            analyze(&image, config, &mut tee)
        }
        None => analyze(&image, config, &mut io::stdout().lock()),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{} on {}: {err}", err.kind(), image.display());
            ExitCode::FAILURE
        }
    }
}

/// Maps the command line flags to a stderrlog verbosity.
///
/// Level 0 still logs errors, so a failed run is never silent.
fn log_verbosity(quiet: bool, verbose: u8) -> usize {
    if quiet { 0 } else { verbose.into() }
}

/// Returns the image to analyse, falling back to the default file name.
///
/// When the default image is missing, the working directory is listed to help
/// the user locate it.
fn resolve_image(arg: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = arg {
        return Some(path);
    }

    let default = Path::new(DEFAULT_IMAGE);
    if default.exists() {
        println!("Found image file: {DEFAULT_IMAGE}");
        return Some(default.to_path_buf());
    }

    let mut stdout = io::stdout().lock();
    if let Err(e) = list_working_dir(&mut stdout) {
        error!("Can't list the working directory: {e}");
    }
    None
}

fn list_working_dir<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "File '{DEFAULT_IMAGE}' not found in current directory.")?;
    writeln!(out, "Files in current directory:")?;

    let mut names: Vec<String> = fs::read_dir(".")?
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    for name in names {
        writeln!(out, "  - {name}")?;
    }

    writeln!(
        out,
        "\nPlease make sure '{DEFAULT_IMAGE}' is in the working directory or pass the image path."
    )
}
