use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "clickstream=info";

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once: if a global subscriber is already set
/// (by the host application or an earlier call) this does nothing.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
