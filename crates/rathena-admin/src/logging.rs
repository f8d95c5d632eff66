//! Log subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Installs a human-readable subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`, which applies to the admin and
/// search crates.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rathena_admin={level},rathena_search={level}")))
}
