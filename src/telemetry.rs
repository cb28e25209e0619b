use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize structured logging.
///
/// Logs go to stderr as JSON; stdout is reserved for the emitted metric
/// records. `RUST_LOG` overrides the configured level.
pub fn init_telemetry(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();

    tracing::info!("jira-kpis telemetry initialized with structured logging");
    Ok(())
}

/// Generate a correlation ID for linking the records and logs of one cycle
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span wrapping one server's gather unit
pub fn create_gather_span(server: &str, project: &str) -> tracing::Span {
    tracing::info_span!(
        "gather_server",
        server = server,
        project = project,
        otel.kind = "client"
    )
}

/// Shutdown telemetry gracefully
pub fn shutdown_telemetry() {
    // For structured logging, no explicit shutdown needed
    tracing::info!("jira-kpis telemetry shutdown complete");
}
