//! Tracing subscriber setup for binaries and ad-hoc tools. The library itself only emits events.

use tracing_subscriber::{EnvFilter, fmt};

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_LEVEL: &str = "photo_framer=info";

/// Install a global fmt subscriber filtered by `RUST_LOG`, falling back to `level`.
///
/// Output goes to stderr. A second call is a no-op.
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

pub fn init_default_logging() {
    init_logging(DEFAULT_LEVEL);
}
