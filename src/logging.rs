//! Tracing setup for the `docstore` binary.
//!
//! Logs go to stderr so stdout stays reserved for command output.
//! `DOCSTORE_LOG` (or `RUST_LOG`) overrides the level picked from flags:
//!
//! ```bash
//! DOCSTORE_LOG=semantic_docstore=debug docstore --load notes.txt query "cats"
//! ```

use tracing_subscriber::EnvFilter;

/// Filter directive for a verbosity count, or `error` when quiet.
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

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: u8, quiet: bool) {
    let filter = std::env::var("DOCSTORE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
