//! Environment-driven configuration.
//!
//! Everything is read from process environment variables (see
//! [`constants`](crate::constants) for the names). The binary loads a `.env`
//! file first, so the same variables can live there.

use crate::constants::*;
use crate::profile::ActiveProfiles;
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::env;
use std::fmt;

/// Where and how to reach Langfuse's OTLP receiver.
#[derive(Clone, PartialEq, Eq)]
pub struct LangfuseConfig {
    pub host: String,
    pub public_key: String,
    pub secret_key: String,
}

impl LangfuseConfig {
    pub fn new(
        host: impl Into<String>,
        public_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Reads `LANGFUSE_HOST`, `LANGFUSE_PUBLIC_KEY` and `LANGFUSE_SECRET_KEY`.
    ///
    /// The host defaults to the Langfuse cloud instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEnvironmentVariable`] if either key is unset.
    pub fn from_env() -> Result<Self> {
        let host = env::var(ENV_LANGFUSE_HOST).unwrap_or_else(|_| DEFAULT_LANGFUSE_HOST.to_string());
        let public_key = env::var(ENV_LANGFUSE_PUBLIC_KEY)
            .map_err(|_| Error::MissingEnvironmentVariable(ENV_LANGFUSE_PUBLIC_KEY))?;
        let secret_key = env::var(ENV_LANGFUSE_SECRET_KEY)
            .map_err(|_| Error::MissingEnvironmentVariable(ENV_LANGFUSE_SECRET_KEY))?;

        Ok(Self {
            host,
            public_key,
            secret_key,
        })
    }

    /// OTLP traces endpoint, e.g. `https://cloud.langfuse.com/api/public/otel`.
    ///
    /// ```
    /// use langfuse_chat_observability::config::LangfuseConfig;
    ///
    /// let config = LangfuseConfig::new("https://us.cloud.langfuse.com/", "pk", "sk");
    /// assert_eq!(config.otlp_endpoint(), "https://us.cloud.langfuse.com/api/public/otel");
    /// ```
    pub fn otlp_endpoint(&self) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), LANGFUSE_OTLP_PATH)
    }

    /// `Basic` authorization header value built from the key pair.
    pub fn auth_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.public_key, self.secret_key));
        format!("Basic {}", encoded)
    }
}

impl fmt::Debug for LangfuseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangfuseConfig")
            .field("host", &self.host)
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Settings for one chat-model provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl ProviderConfig {
    /// Reads a provider block; `None` when its API key variable is unset or empty.
    fn from_env(
        key_var: &str,
        base_url_var: &str,
        model_var: &str,
        default_base_url: &str,
        default_model: &str,
    ) -> Option<Self> {
        let api_key = env::var(key_var).ok().filter(|k| !k.is_empty())?;
        Some(Self {
            api_key,
            base_url: env::var(base_url_var).unwrap_or_else(|_| default_base_url.to_string()),
            model: env::var(model_var).unwrap_or_else(|_| default_model.to_string()),
        })
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub service_name: String,
    pub langfuse: LangfuseConfig,
    pub profiles: ActiveProfiles,
    pub openai: Option<ProviderConfig>,
    pub google: Option<ProviderConfig>,
}

impl AppConfig {
    /// Reads the whole configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails only when the Langfuse credentials are missing; providers without
    /// an API key are left unconfigured.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            service_name: env::var(ENV_OTEL_SERVICE_NAME)
                .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),
            langfuse: LangfuseConfig::from_env()?,
            profiles: ActiveProfiles::parse(&env::var(ENV_CHAT_PROFILES_ACTIVE).unwrap_or_default()),
            openai: ProviderConfig::from_env(
                ENV_OPENAI_API_KEY,
                ENV_OPENAI_BASE_URL,
                ENV_OPENAI_MODEL,
                DEFAULT_OPENAI_BASE_URL,
                DEFAULT_OPENAI_MODEL,
            ),
            google: ProviderConfig::from_env(
                ENV_GOOGLE_API_KEY,
                ENV_GOOGLE_BASE_URL,
                ENV_GOOGLE_MODEL,
                DEFAULT_GOOGLE_BASE_URL,
                DEFAULT_GOOGLE_MODEL,
            ),
        })
    }
}
