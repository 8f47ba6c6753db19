use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// Honours `RUST_LOG` (default `info`). Calling it again is a no-op.
pub fn init() {
    let result = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::debug!("✅ Tracing initialized");
    }
}
