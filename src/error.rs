//! Error types for langfuse-chat-observability.

use opentelemetry_sdk::error::OTelSdkError;
use thiserror::Error;

/// Error type for langfuse-chat-observability operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(&'static str),

    /// Required configuration is missing.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(&'static str),

    /// OTLP exporter build error.
    #[error("OTLP exporter error: {0}")]
    OtlpExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// Tracer provider flush or shutdown failed.
    #[error("OpenTelemetry SDK error: {0}")]
    Sdk(#[from] OTelSdkError),

    /// Transport failure talking to a chat-model provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered, but not with something we can use.
    #[error("{provider} returned {status}: {body}")]
    Provider {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// More than one primary chat-model profile is active.
    #[error("Profiles {0} and {1} are both active; only one primary chat model may be bound")]
    AmbiguousPrimary(&'static str, &'static str),

    /// An active profile points at a delegate nobody registered.
    #[error("No chat model registered under '{0}'")]
    MissingDelegate(&'static str),

    /// The model produced no completion text.
    #[error("Chat model returned an empty completion")]
    EmptyCompletion,
}

/// Result type alias for langfuse-chat-observability operations.
pub type Result<T> = std::result::Result<T, Error>;
