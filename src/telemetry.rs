//! Process-wide tracing and logging setup.

use crate::config::AppConfig;
use crate::exporter::ExporterBuilder;
use crate::Result;
use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::runtime::Tokio;
use opentelemetry_sdk::trace::span_processor_with_async_runtime::BatchSpanProcessor;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Calling it again is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub(crate) fn resource(service_name: &str) -> Resource {
    Resource::builder()
        .with_attributes(vec![
            KeyValue::new("service.name", service_name.to_string()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build()
}

/// Builds a tracer provider that batches spans to Langfuse on the Tokio
/// runtime and installs it as the global provider.
///
/// Must be called from within a Tokio runtime. Keep the returned provider and
/// call [`SdkTracerProvider::shutdown`] before exit so queued spans are flushed.
pub fn init_tracer_provider(config: &AppConfig) -> Result<SdkTracerProvider> {
    let exporter = ExporterBuilder::from_config(&config.langfuse).build()?;
    let processor = BatchSpanProcessor::builder(exporter, Tokio).build();

    let provider = SdkTracerProvider::builder()
        .with_span_processor(processor)
        .with_resource(resource(&config.service_name))
        .build();

    global::set_tracer_provider(provider.clone());
    tracing::info!(
        service = %config.service_name,
        endpoint = %config.langfuse.otlp_endpoint(),
        "tracer provider initialized"
    );

    Ok(provider)
}

/// Flushes queued spans and shuts the provider down.
pub fn shutdown_tracer_provider(provider: SdkTracerProvider) -> Result<()> {
    provider.shutdown()?;
    tracing::debug!("tracer provider shut down");
    Ok(())
}
