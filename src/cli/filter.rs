//! CLI dispatch for the `depthaa filter` command.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use crate::config::{CliOverrides, DepthaaConfig};
use crate::depth_map::DepthMap;
use crate::output::{generate_output_path, save_depth};
use crate::pass::{apply_with_stats, PassStats};

use super::{find_depth_files, load_effective_config, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Expand directories into the depth images they contain.
///
/// Files found inside a directory whose stem already ends with `suffix` are
/// earlier results and are skipped. Explicitly named files are always kept.
fn collect_inputs(inputs: &[PathBuf], suffix: &str) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found: Vec<PathBuf> = find_depth_files(input)
                .into_iter()
                .filter(|path| {
                    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
                    let filtered_before = stem.ends_with(suffix);
                    if filtered_before {
                        tracing::debug!(path = %path.display(), "skipping previous output");
                    }
                    !filtered_before
                })
                .collect();
            if found.is_empty() {
                tracing::warn!(dir = %input.display(), "no depth images in directory");
            }
            files.extend(found);
        } else if input.exists() {
            files.push(input.clone());
        } else {
            return Err(format!("Input not found: '{}'", input.display()));
        }
    }
    Ok(files)
}

/// Returns true if both paths name the same existing file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Pair every input with its output path, rejecting plans that would
/// overwrite an input, write two results to one file, or write a file whose
/// extension disagrees with the output format.
fn plan_outputs(
    files: &[PathBuf],
    output: Option<&Path>,
    config: &DepthaaConfig,
) -> Result<Vec<(PathBuf, PathBuf)>, String> {
    let format = config.output.format;
    let is_single = files.len() == 1;
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    let mut plan = Vec::with_capacity(files.len());

    for input in files {
        let output_path =
            generate_output_path(input, output, &config.output.suffix, format, is_single);

        let ext_matches = output_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(format.extension()))
            .unwrap_or(false);
        if !ext_matches {
            return Err(format!(
                "Output '{}' does not match --format {} (expected .{})",
                output_path.display(),
                format,
                format.extension()
            ));
        }

        if files.iter().any(|f| is_same_file(f, &output_path)) {
            return Err(format!(
                "Output '{}' would overwrite an input depth map",
                output_path.display()
            ));
        }

        if let Some(previous) = seen.insert(output_path.clone(), input.as_path()) {
            return Err(format!(
                "'{}' and '{}' would both be written to '{}'",
                previous.display(),
                input.display(),
                output_path.display()
            ));
        }

        plan.push((input.clone(), output_path));
    }

    Ok(plan)
}

/// Filter one file and write the result.
fn filter_file(
    input: &Path,
    output: &Path,
    config: &DepthaaConfig,
) -> Result<PassStats, String> {
    let started = Instant::now();
    let map = DepthMap::load(input).map_err(|e| format!("'{}': {}", input.display(), e))?;

    let (filtered, stats) = apply_with_stats(&map, &config.sampling, &config.filter);

    save_depth(&filtered, output, config.output.format)
        .map_err(|e| format!("Failed to save '{}': {}", output.display(), e))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        width = map.width(),
        height = map.height(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "filtered depth map"
    );

    Ok(stats)
}

/// Execute the filter command.
pub fn run_filter(
    inputs: &[PathBuf],
    output: Option<&Path>,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    show_stats: bool,
) -> ExitCode {
    let config = match load_effective_config(config_path, overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let files = match collect_inputs(inputs, &config.output.suffix) {
        Ok(files) => files,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if files.is_empty() {
        eprintln!("Error: No depth images found in the given inputs");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let plan = match plan_outputs(&files, output, &config) {
        Ok(plan) => plan,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(config.run.jobs).build() {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Error: Failed to start worker threads: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    tracing::debug!(
        files = files.len(),
        threads = pool.current_num_threads(),
        mode = %config.sampling.mode,
        format = %config.output.format,
        "filtering depth maps"
    );

    let mut total = PassStats::default();
    let mut failed = 0usize;

    for (input, output_path) in &plan {
        match pool.install(|| filter_file(input, output_path, &config)) {
            Ok(stats) => {
                println!("Saved: {}", output_path.display());
                if show_stats {
                    println!("  {}", stats);
                }
                total = total.merge(stats);
            }
            Err(msg) => {
                eprintln!("Error: {}", msg);
                failed += 1;
            }
        }
    }

    if show_stats && files.len() > 1 {
        println!("Total: {}", total);
    }

    if failed > 0 {
        eprintln!("Error: {} of {} depth maps failed", failed, files.len());
        return ExitCode::from(EXIT_ERROR);
    }

    ExitCode::from(EXIT_SUCCESS)
}
