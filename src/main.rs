//! depthaa - Command-line tool for antialiasing depth maps

use std::process::ExitCode;

use depthaa::cli;

fn main() -> ExitCode {
    cli::run()
}
