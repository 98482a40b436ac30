use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so the report on stdout stays clean. `RUST_LOG`
/// overrides the default, which only lets errors through.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
