//! Structured logging with `tracing`.
//!
//! Session operations run inside `#[instrument]` spans. State transitions and
//! expected rejections (empty credentials, a downgrade request) log at
//! `debug`. Recoveries such as a corrupt record or storage falling back to
//! memory log at `warn`. Nothing is persisted; output goes to stderr.

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

/// Default filter when neither `RUST_LOG` nor settings provide one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber with stderr output.
///
/// `RUST_LOG` takes precedence over `level`. Calling this more than once is
/// a no-op.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = subscriber.try_init();
}
