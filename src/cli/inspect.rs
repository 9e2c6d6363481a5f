//! CLI dispatch for the `depthaa inspect` command.
//!
//! Runs the filter at a single pixel and prints every stage: footprint,
//! ring, edge offset, near/far mixes, bounds and the final outcome.

use std::fmt::Write as _;
use std::path::Path;
use std::process::ExitCode;

use crate::antialias::FilterTrace;
use crate::config::CliOverrides;
use crate::depth_map::DepthMap;
use crate::pass::trace_pixel;

use super::{load_effective_config, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Render a trace as an indented, human-readable report.
pub fn format_trace(trace: &FilterTrace) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "uv:         ({:.6}, {:.6})", trace.uv.x, trace.uv.y);
    let _ = writeln!(out, "resolution: {} x {}", trace.resolution.x, trace.resolution.y);
    let _ = writeln!(out, "center:     {:.6}", trace.center);

    if let Some(fp) = &trace.footprint {
        let _ = writeln!(
            out,
            "footprint:  {:.3} x {:.3} texels (step {:.6}, {:.6})",
            fp.step_count.x, fp.step_count.y, fp.step.x, fp.step.y
        );
    }
    if let Some(ring) = &trace.ring {
        let _ = writeln!(
            out,
            "ring:       tl {:.6}  tr {:.6}  bl {:.6}  br {:.6}",
            ring.tl, ring.tr, ring.bl, ring.br
        );
    }
    if let Some(dir) = trace.direction {
        let _ = writeln!(out, "direction:  ({:.6}, {:.6})", dir.x, dir.y);
    }
    if let Some(fields) = &trace.fields {
        let _ = writeln!(out, "near mix:   {:.6}", fields.near_mix);
        let _ = writeln!(out, "far mix:    {:.6}", fields.far_mix);
    }
    if let Some(bounds) = &trace.bounds {
        let _ = writeln!(out, "bounds:     [{:.6}, {:.6}]", bounds.min, bounds.max);
    }

    let _ = writeln!(out, "outcome:    {}", trace.outcome);
    let _ = write!(out, "depth:      {:.6}", trace.depth);
    out
}

/// Execute the inspect command.
pub fn run_inspect(
    input: &Path,
    x: u32,
    y: u32,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    json: bool,
) -> ExitCode {
    let config = match load_effective_config(config_path, overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let map = match DepthMap::load(input) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Error: '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if x >= map.width() || y >= map.height() {
        eprintln!(
            "Error: pixel ({}, {}) is outside the {}x{} depth map",
            x,
            y,
            map.width(),
            map.height()
        );
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let trace = trace_pixel(&map, x, y, &config.sampling, &config.filter);

    if json {
        match serde_json::to_string_pretty(&trace) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: Failed to serialize trace: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("pixel:      ({}, {}) in '{}'", x, y, input.display());
        println!("{}", format_trace(&trace));
    }

    ExitCode::from(EXIT_SUCCESS)
}
