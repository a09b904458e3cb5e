//! Langfuse observability for chat-model calls.
//!
//! This crate wires a chat model into [Langfuse](https://langfuse.com) through
//! OpenTelemetry. Each chat call becomes a client span; an
//! [`ObservationFilter`] attaches the prompt and completion text as the
//! high-cardinality attributes `gen_ai.prompt` and `gen_ai.completion`, which
//! Langfuse renders as the generation's input and output.
//!
//! # Quick Start
//!
//! ```no_run
//! use langfuse_chat_observability::{
//!     init_tracer_provider, AppConfig, ChatContentObservationFilter, ObservedChatModel,
//!     OpenAiChatModel, PoemService,
//! };
//! use opentelemetry::global;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Requires: LANGFUSE_PUBLIC_KEY, LANGFUSE_SECRET_KEY (LANGFUSE_HOST optional)
//! let config = AppConfig::from_env()?;
//! let provider = init_tracer_provider(&config)?;
//!
//! let model = ObservedChatModel::new(OpenAiChatModel::new("sk-..."), global::tracer("chat"))
//!     .with_filter(ChatContentObservationFilter);
//!
//! let poem = PoemService::new(model).write_a_poem("LangFuse", 4).await?;
//! println!("{poem}");
//!
//! provider.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Components
//!
//! - [`filter`]: observation filters, including the prompt/completion filter
//! - [`profile`]: picks the primary chat model from the active profile
//!   (`openai` or `google`)
//! - [`observed`]: span-per-call instrumentation around any [`ChatModel`]
//! - [`startup`]: boot-time hook that writes one poem
//! - [`exporter`] / [`telemetry`]: OTLP export to Langfuse
//!
//! # Environment Variables
//!
//! - `LANGFUSE_HOST`: Base URL of your Langfuse instance (defaults to `https://cloud.langfuse.com`)
//! - `LANGFUSE_PUBLIC_KEY` / `LANGFUSE_SECRET_KEY`: Langfuse project keys
//! - `CHAT_PROFILES_ACTIVE`: comma-separated active profiles
//! - `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL`
//! - `GOOGLE_API_KEY`, `GOOGLE_BASE_URL`, `GOOGLE_MODEL`
//! - `OTEL_SERVICE_NAME`: service name on exported spans
//! - `RUST_LOG`: log filter (defaults to `info`)

pub mod ai_service;
pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod google;
pub mod key_names;
pub mod observation;
pub mod observed;
pub mod openai;
pub mod profile;
pub mod startup;
pub mod telemetry;

// Re-export main types
pub use ai_service::PoemService;
pub use chat::ChatModel;
pub use config::{AppConfig, LangfuseConfig, ProviderConfig};
pub use error::{Error, Result};
pub use exporter::{exporter, exporter_from_env, ExporterBuilder};
pub use filter::{concatenate_strings, ChatContentObservationFilter, ObservationFilter};
pub use google::GoogleGenAiChatModel;
pub use key_names::{GenAiAttributes, HighCardinalityKeyName};
pub use observation::{
    AssistantMessage, ChatRequest, ChatResponse, Generation, Instruction, ObservationContext,
    ObservationKind, Role, TokenUsage,
};
pub use observed::ObservedChatModel;
pub use openai::OpenAiChatModel;
pub use profile::{
    resolve_chat_model, select_primary, ActiveProfiles, ChatModelRegistry, PrimaryChatModel,
    Profile,
};
pub use startup::StartupHook;
pub use telemetry::{init_logging, init_tracer_provider, shutdown_tracer_provider};
