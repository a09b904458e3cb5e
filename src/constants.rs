//! Environment variable names and defaults.

/// Environment variable name for the Langfuse public key.
pub const ENV_LANGFUSE_PUBLIC_KEY: &str = "LANGFUSE_PUBLIC_KEY";

/// Environment variable name for the Langfuse secret key.
pub const ENV_LANGFUSE_SECRET_KEY: &str = "LANGFUSE_SECRET_KEY";

/// Environment variable name for the Langfuse host URL.
pub const ENV_LANGFUSE_HOST: &str = "LANGFUSE_HOST";

/// Default Langfuse cloud host URL.
pub const DEFAULT_LANGFUSE_HOST: &str = "https://cloud.langfuse.com";

/// Path appended to the Langfuse host to reach its OTLP receiver.
pub const LANGFUSE_OTLP_PATH: &str = "/api/public/otel";

/// Comma-separated list of active configuration profiles.
pub const ENV_CHAT_PROFILES_ACTIVE: &str = "CHAT_PROFILES_ACTIVE";

/// Service name reported on the exported resource.
pub const ENV_OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";

pub const DEFAULT_SERVICE_NAME: &str = "langfuse-chat-demo";

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_GOOGLE_BASE_URL: &str = "GOOGLE_BASE_URL";
pub const ENV_GOOGLE_MODEL: &str = "GOOGLE_MODEL";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GOOGLE_MODEL: &str = "gemini-2.0-flash";
