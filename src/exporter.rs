//! Langfuse OTLP span exporter.
//!
//! Langfuse accepts traces over OTLP/HTTP (protobuf) at
//! `{host}/api/public/otel`, authenticated with HTTP Basic auth built from the
//! project's public and secret keys. See the
//! [Langfuse OpenTelemetry documentation](https://langfuse.com/integrations/native/opentelemetry).

use crate::config::LangfuseConfig;
use crate::{Error, Result};
use opentelemetry_otlp::{SpanExporter, WithExportConfig, WithHttpConfig};
use std::collections::HashMap;
use std::time::Duration;

const AUTHORIZATION: &str = "Authorization";

/// Builder for a Langfuse OTLP exporter.
#[derive(Debug, Default)]
pub struct ExporterBuilder {
    endpoint: Option<String>,
    auth_header: Option<String>,
    timeout: Option<Duration>,
    additional_headers: HashMap<String, String>,
    http_client: Option<reqwest::Client>,
}

impl ExporterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a [`LangfuseConfig`]: endpoint and Basic auth filled in.
    pub fn from_config(config: &LangfuseConfig) -> Self {
        Self::new()
            .with_endpoint(config.otlp_endpoint())
            .with_auth_header(config.auth_header())
    }

    /// Starts from `LANGFUSE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(&LangfuseConfig::from_env()?))
    }

    /// Sets the complete OTLP endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the `Authorization` header value. Wins over any header added with
    /// [`with_header`](Self::with_header).
    pub fn with_auth_header(mut self, auth_header: impl Into<String>) -> Self {
        self.auth_header = Some(auth_header.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_headers.insert(name.into(), value.into());
        self
    }

    /// Uses a caller-provided HTTP client (proxies, custom TLS).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Resolves the final header map.
    ///
    /// Authorization keys are matched case-insensitively and normalized to
    /// `Authorization`; an explicit auth header replaces them.
    fn resolve_headers(
        additional: HashMap<String, String>,
        auth_header: Option<String>,
    ) -> Result<HashMap<String, String>> {
        let mut headers = HashMap::new();
        let mut from_headers = None;
        for (name, value) in additional {
            if name.eq_ignore_ascii_case(AUTHORIZATION) {
                from_headers = Some(value);
            } else {
                headers.insert(name, value);
            }
        }

        let authorization = auth_header
            .or(from_headers)
            .ok_or(Error::MissingConfiguration(
                "Authorization header or Langfuse credentials",
            ))?;
        headers.insert(AUTHORIZATION.to_string(), authorization);

        Ok(headers)
    }

    /// Builds the OTLP/HTTP span exporter.
    ///
    /// # Errors
    ///
    /// [`Error::MissingConfiguration`] without an endpoint or authorization;
    /// [`Error::OtlpExporter`] if the OTLP builder rejects the settings.
    pub fn build(self) -> Result<SpanExporter> {
        let endpoint = self
            .endpoint
            .ok_or(Error::MissingConfiguration("endpoint"))?;
        let headers = Self::resolve_headers(self.additional_headers, self.auth_header)?;

        let mut http_config = SpanExporter::builder()
            .with_http()
            .with_http_client(self.http_client.unwrap_or_default())
            .with_endpoint(endpoint)
            .with_headers(headers);

        if let Some(timeout) = self.timeout {
            http_config = http_config.with_timeout(timeout);
        }

        Ok(http_config.build()?)
    }
}

/// Creates an exporter for the given Langfuse settings.
pub fn exporter(config: &LangfuseConfig) -> Result<SpanExporter> {
    ExporterBuilder::from_config(config).build()
}

/// Creates an exporter from `LANGFUSE_*` environment variables.
pub fn exporter_from_env() -> Result<SpanExporter> {
    ExporterBuilder::from_env()?.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ENV_LANGFUSE_HOST, ENV_LANGFUSE_PUBLIC_KEY, ENV_LANGFUSE_SECRET_KEY};
    use serial_test::serial;
    use std::env;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_explicit_auth_header_wins() {
        let resolved = ExporterBuilder::resolve_headers(
            headers(&[("authorization", "Bearer from-header"), ("x-trace", "1")]),
            Some("Basic from-config".to_string()),
        )
        .unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["Authorization"], "Basic from-config");
        assert_eq!(resolved["x-trace"], "1");
    }

    #[test]
    fn test_authorization_header_is_normalized() {
        let resolved = ExporterBuilder::resolve_headers(
            headers(&[("AUTHORIZATION", "Bearer token")]),
            None,
        )
        .unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved["Authorization"], "Bearer token");
    }

    #[test]
    fn test_missing_authorization() {
        let result = ExporterBuilder::new()
            .with_endpoint("https://test.com")
            .build();
        assert!(matches!(result, Err(Error::MissingConfiguration(_))));
    }

    #[test]
    fn test_missing_endpoint() {
        let result = ExporterBuilder::new().with_auth_header("Basic x").build();
        assert!(matches!(result, Err(Error::MissingConfiguration("endpoint"))));
    }

    #[test]
    fn test_exporter_from_config() {
        let config = LangfuseConfig::new("https://cloud.langfuse.com", "pk", "sk");
        let builder = ExporterBuilder::from_config(&config);
        assert_eq!(
            builder.endpoint.as_deref(),
            Some("https://cloud.langfuse.com/api/public/otel")
        );
        assert_eq!(builder.auth_header, Some(config.auth_header()));

        assert!(exporter(&config).is_ok());
    }

    #[test]
    #[serial]
    fn test_exporter_from_env() {
        env::set_var(ENV_LANGFUSE_HOST, "https://test.langfuse.com");
        env::set_var(ENV_LANGFUSE_PUBLIC_KEY, "pk-test");
        env::set_var(ENV_LANGFUSE_SECRET_KEY, "sk-test");

        assert!(exporter_from_env().is_ok());

        env::remove_var(ENV_LANGFUSE_HOST);
        env::remove_var(ENV_LANGFUSE_PUBLIC_KEY);
        env::remove_var(ENV_LANGFUSE_SECRET_KEY);
    }

    #[test]
    #[serial]
    fn test_exporter_from_env_missing_credentials() {
        env::remove_var(ENV_LANGFUSE_PUBLIC_KEY);
        env::remove_var(ENV_LANGFUSE_SECRET_KEY);

        let result = ExporterBuilder::from_env();
        assert!(matches!(result, Err(Error::MissingEnvironmentVariable(_))));
    }
}
