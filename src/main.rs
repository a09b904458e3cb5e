//! Boots the chat demo: selects the primary chat model for the active
//! profile, instruments it for Langfuse and writes one poem at startup.

use langfuse_chat_observability::{
    init_logging, init_tracer_provider, resolve_chat_model, shutdown_tracer_provider, AppConfig,
    ChatContentObservationFilter, ChatModelRegistry, GoogleGenAiChatModel, ObservedChatModel,
    OpenAiChatModel, PoemService, Profile, StartupHook,
};
use opentelemetry::global;
use std::sync::Arc;

fn build_registry(config: &AppConfig) -> ChatModelRegistry {
    let mut registry = ChatModelRegistry::new();

    if let Some(openai) = &config.openai {
        registry.register(
            Profile::OpenAi.delegate(),
            Arc::new(
                OpenAiChatModel::new(&openai.api_key)
                    .with_base_url(&openai.base_url)
                    .with_model(&openai.model),
            ),
        );
    }

    if let Some(google) = &config.google {
        registry.register(
            Profile::Google.delegate(),
            Arc::new(
                GoogleGenAiChatModel::new(&google.api_key)
                    .with_base_url(&google.base_url)
                    .with_model(&google.model),
            ),
        );
    }

    registry
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let chat_model = resolve_chat_model(&config.profiles, &build_registry(&config))?;
    let provider = init_tracer_provider(&config)?;

    let model = ObservedChatModel::new(chat_model, global::tracer("langfuse-chat-demo"))
        .with_filter(ChatContentObservationFilter::new());
    let service = PoemService::new(model);

    let result = StartupHook::new().fire(&service).await;

    shutdown_tracer_provider(provider)?;
    result?;

    Ok(())
}
