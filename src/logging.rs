//! tracing subscriber setup for the `tally` binary

use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout stays parseable.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "xlsx_tally=debug"
    } else {
        "xlsx_tally=warn"
    };

    // A second init (e.g. from tests) is not an error worth surfacing
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
