//! Log output for the `lisagg` binary.

use tracing_subscriber::EnvFilter;

/// Library crates whose events reach the log alongside the binary's own.
const LIBRARY_TARGETS: &[&str] = &[
    "lisagg_aggregate",
    "lisagg_calendar",
    "lisagg_io",
    "lisagg_pipeline",
    "lisagg_stats",
];

/// Level for a `-v` count: 0 -> warn, 1 -> info, 2 -> debug, 3+ -> trace.
fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter directives enabling this binary and the workspace libraries at
/// `level`. Dependencies stay silent.
fn default_directives(level: &str) -> String {
    std::iter::once(env!("CARGO_CRATE_NAME"))
        .chain(LIBRARY_TARGETS.iter().copied())
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. A set `RUST_LOG` wins over `verbosity`.
///
/// Events carry the thread name, so output from the `lisagg-worker-N`
/// pool can be told apart.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level(verbosity))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();
}
