//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod config;
mod filter;
mod inspect;

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, DepthaaConfig};
use crate::output::OutputFormat;
use crate::sampler::FilterMode;

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Extensions picked up when a directory is given as input
pub const DEPTH_EXTENSIONS: &[&str] = &["png", "exr", "tif", "tiff"];

/// Check if a path has a depth image extension.
pub fn is_depth_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| DEPTH_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Find all depth images in a directory (recursively), sorted by path.
///
/// Extensions match case-insensitively, so `DEPTH.EXR` is found too.
pub fn find_depth_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*", glob::Pattern::escape(&dir.display().to_string()));

    let mut files: Vec<PathBuf> = match glob(&pattern) {
        Ok(paths) => {
            paths.filter_map(Result::ok).filter(|p| p.is_file() && is_depth_file(p)).collect()
        }
        Err(_) => Vec::new(),
    };

    files.sort();
    files
}

/// depthaa - Edge-aware antialiasing for depth maps
#[derive(Parser)]
#[command(name = "depthaa")]
#[command(about = "depthaa - Smooth stair-stepped silhouettes in depth maps")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Antialias depth maps and write the results
    Filter {
        /// Depth images or directories of depth images (.png, .exr, .tif, .tiff)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file or directory.
        /// If omitted: {input}{suffix}.{ext} next to the input
        /// If file (single input): output.png
        /// If file (multiple): output_{input}.png
        /// If directory (ends with /): dir/{input}.{ext}
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to depthaa.toml (default: discovered from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Depth sampling mode
        #[arg(long, value_enum)]
        mode: Option<FilterMode>,

        /// Output encoding
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Suffix appended to output names when -o is omitted
        #[arg(long)]
        suffix: Option<String>,

        /// Worker threads (0 = one per core)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print per-image outcome counts
        #[arg(long)]
        stats: bool,
    },

    /// Show every intermediate value of the filter at one pixel
    Inspect {
        /// Depth image to read
        input: PathBuf,

        /// Pixel column
        #[arg(long)]
        x: u32,

        /// Pixel row
        #[arg(long)]
        y: u32,

        /// Path to depthaa.toml (default: discovered from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Depth sampling mode
        #[arg(long, value_enum)]
        mode: Option<FilterMode>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Path to depthaa.toml (default: discovered from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Load depthaa.toml (explicit or discovered) and apply CLI overrides.
///
/// Errors are reported on stderr; the returned code is what the command
/// should exit with.
pub(crate) fn load_effective_config(
    path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<DepthaaConfig, ExitCode> {
    let mut config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    merge_cli_overrides(&mut config, overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        for error in errors {
            eprintln!("Error: {}", error);
        }
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }

    Ok(config)
}

/// Parse arguments, set up logging and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Filter { inputs, output, config, mode, format, suffix, jobs, stats } => {
            let overrides = CliOverrides { mode, format, suffix, jobs };
            filter::run_filter(&inputs, output.as_deref(), config.as_deref(), &overrides, stats)
        }
        Commands::Inspect { input, x, y, config, mode, json } => {
            let overrides = CliOverrides { mode, ..Default::default() };
            inspect::run_inspect(&input, x, y, config.as_deref(), &overrides, json)
        }
        Commands::Config { config } => config::run_config(config.as_deref()),
    }
}
