//! Google Gemini (`generateContent`) backend.

use crate::chat::{send_json, ChatModel};
use crate::constants::{DEFAULT_GOOGLE_BASE_URL, DEFAULT_GOOGLE_MODEL};
use crate::observation::{
    AssistantMessage, ChatRequest, ChatResponse, Generation, Role, TokenUsage,
};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat model backed by the Gemini API.
#[derive(Clone, Debug)]
pub struct GoogleGenAiChatModel {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GoogleGenAiChatModel {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_GOOGLE_BASE_URL.to_string(),
            model: DEFAULT_GOOGLE_MODEL.to_string(),
        }
    }

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

    fn generate_content_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

// Gemini takes system messages out of band and calls the assistant "model".
fn build_request(request: &ChatRequest) -> GenerateContentRequest<'_> {
    let system: Vec<Part<'_>> = request
        .instructions
        .iter()
        .filter(|i| i.role == Role::System)
        .map(|i| Part { text: &i.text })
        .collect();

    let contents = request
        .instructions
        .iter()
        .filter(|i| i.role != Role::System)
        .map(|i| Content {
            role: match i.role {
                Role::Assistant => "model",
                _ => "user",
            },
            parts: vec![Part { text: &i.text }],
        })
        .collect();

    GenerateContentRequest {
        system_instruction: (!system.is_empty()).then_some(SystemInstruction { parts: system }),
        contents,
        generation_config: request.temperature.map(|temperature| GenerationConfig {
            temperature,
        }),
    }
}

#[async_trait]
impl ChatModel for GoogleGenAiChatModel {
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        tracing::debug!(model, "sending Gemini generateContent");

        let http = self
            .client
            .post(self.generate_content_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(request));

        let response: GenerateContentResponse = send_json("google", http).await?;
        Ok(response.into())
    }

    fn system(&self) -> &'static str {
        "gcp.gen_ai"
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

impl From<GenerateContentResponse> for ChatResponse {
    fn from(response: GenerateContentResponse) -> Self {
        ChatResponse {
            results: response
                .candidates
                .into_iter()
                .map(|candidate| Generation {
                    output: candidate.content.map(|content| {
                        let texts: Vec<String> =
                            content.parts.into_iter().filter_map(|p| p.text).collect();
                        AssistantMessage {
                            text: (!texts.is_empty()).then(|| texts.concat()),
                        }
                    }),
                    finish_reason: candidate.finish_reason,
                })
                .collect(),
            model: response.model_version,
            usage: response.usage_metadata.map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            }),
        }
    }
}
