use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "spent=info";

/// Install the global subscriber. Respects `RUST_LOG`, falling back to
/// [DEFAULT_FILTER]. Logs go to stderr so command output stays clean.
pub(crate) fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_log = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_log)
        .try_init();
}
