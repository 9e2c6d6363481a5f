//! CLI dispatch for the `depthaa config` command.

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;

use super::{load_effective_config, EXIT_ERROR, EXIT_SUCCESS};

/// Print the effective configuration as TOML.
pub fn run_config(config_path: Option<&Path>) -> ExitCode {
    let config = match load_effective_config(config_path, &CliOverrides::default()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match toml::to_string_pretty(&config) {
        Ok(text) => {
            print!("{}", text);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to serialize config: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
