use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

/// Installs the global subscriber: `RUST_LOG` driven filtering and JSON lines on
/// stderr, so stdout stays free for the interactive front end.
pub fn config_telemetry(service_name: &'static str) -> anyhow::Result<()> {
    // Needed to forward ordinary log statements to our tracing subscriber.
    tracing_log::LogTracer::init().context("Failed to initialize log tracer")?;

    let subscriber = Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_thread_names(true)
                .with_writer(std::io::stderr),
        );

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber")?;

    tracing::info!(service.name = service_name, "telemetry configured");
    Ok(())
}
