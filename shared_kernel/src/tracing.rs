use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

/// Installs the global `tracing` subscriber for a job run. Filtering follows
/// `RUST_LOG`, defaulting to `info`.
pub fn config_telemetry() {
    // Needed to forward ordinary log statements to our tracing subscriber.
    tracing_log::LogTracer::init().expect("Failed to initialize log tracer");

    let subscriber = Registry::default()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false));

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to install `tracing` subscriber");
}
