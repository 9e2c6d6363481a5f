//! Diagnostic logging setup
//!
//! Diagnostics go to stderr through `tracing`. `RUST_LOG` wins when set;
//! otherwise the level follows `-q` / `-v`.

use tracing_subscriber::EnvFilter;

/// Log directive for the given verbosity flags.
///
/// | Flags | Level |
/// |-------|-------|
/// | `-q` | error |
/// | none | warn |
/// | `-v` | info |
/// | `-vv` | debug |
/// | `-vvv` or more | trace |
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
