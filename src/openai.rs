//! OpenAI chat-completions backend.

use crate::chat::{send_json, ChatModel};
use crate::constants::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use crate::observation::{
    AssistantMessage, ChatRequest, ChatResponse, Generation, TokenUsage,
};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat model backed by the OpenAI `/v1/chat/completions` endpoint.
#[derive(Clone, Debug)]
pub struct OpenAiChatModel {
    client: reqwest::Client,
    auth_header: String,
    base_url: String,
    model: String,
}

impl OpenAiChatModel {
    pub fn new(api_key: impl AsRef<str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_header: format!("Bearer {}", api_key.as_ref()),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }

    /// Points the model at an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request<'a>(&'a self, request: &'a ChatRequest) -> OpenAiRequest<'a> {
        OpenAiRequest {
            model: request.model.as_deref().unwrap_or(&self.model),
            messages: request
                .instructions
                .iter()
                .map(|i| OpenAiMessage {
                    role: i.role.as_str(),
                    content: &i.text,
                })
                .collect(),
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let body = self.build_request(request);
        tracing::debug!(model = body.model, "sending OpenAI chat completion");

        let http = self
            .client
            .post(self.chat_completions_url())
            .header("Authorization", &self.auth_header)
            .json(&body);

        let response: OpenAiResponse = send_json("openai", http).await?;
        Ok(response.into())
    }

    fn system(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    #[serde(default)]
    message: Option<OpenAiResponseMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl From<OpenAiResponse> for ChatResponse {
    fn from(response: OpenAiResponse) -> Self {
        ChatResponse {
            results: response
                .choices
                .into_iter()
                .map(|choice| Generation {
                    output: choice
                        .message
                        .map(|m| AssistantMessage { text: m.content }),
                    finish_reason: choice.finish_reason,
                })
                .collect(),
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        }
    }
}
