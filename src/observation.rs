//! Observation data model for chat-model calls.
//!
//! An [`ObservationContext`] represents one in-flight instrumented operation.
//! Contexts for chat-model calls carry the [`ChatRequest`] that was sent and,
//! once the call returned, the [`ChatResponse`]. Filters read that payload and
//! attach key-values; the observed model copies them onto the span.

use opentelemetry::KeyValue;

/// Who authored a prompt message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One prompt message sent to the model.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub role: Role,
    /// Message text. May be empty.
    pub text: String,
}

impl Instruction {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// A chat-model request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatRequest {
    pub instructions: Vec<Instruction>,
    /// Overrides the provider's configured model when set.
    pub model: Option<String>,
    pub temperature: Option<f64>,
}

impl ChatRequest {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Message produced by the model for one generation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssistantMessage {
    pub text: Option<String>,
}

impl AssistantMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// One result of a chat call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Generation {
    pub output: Option<AssistantMessage>,
    pub finish_reason: Option<String>,
}

impl Generation {
    /// Generation carrying the given output text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            output: Some(AssistantMessage::new(text)),
            finish_reason: None,
        }
    }

    /// Output text, if both the output and its text are present.
    pub fn output_text(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.text.as_deref())
    }
}

/// Token accounting reported by the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A chat-model response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatResponse {
    /// Generations in provider order. A provider that sends no list yields an empty one.
    pub results: Vec<Generation>,
    pub model: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    pub fn new(results: Vec<Generation>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// The first generation, if any.
    pub fn result(&self) -> Option<&Generation> {
        self.results.first()
    }
}

/// Payload of a chat-model observation.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatModelObservation {
    pub request: ChatRequest,
    pub response: Option<ChatResponse>,
}

/// What kind of operation an observation describes.
#[derive(Clone, Debug, PartialEq)]
pub enum ObservationKind {
    ChatModel(ChatModelObservation),
    Other,
}

/// Mutable record of one instrumented operation.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationContext {
    name: String,
    kind: ObservationKind,
    low_cardinality: Vec<KeyValue>,
    high_cardinality: Vec<KeyValue>,
}

impl ObservationContext {
    /// Creates a context for an operation that is not a chat-model call.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ObservationKind::Other,
            low_cardinality: Vec::new(),
            high_cardinality: Vec::new(),
        }
    }

    /// Creates a chat-model context.
    pub fn chat(
        name: impl Into<String>,
        request: ChatRequest,
        response: Option<ChatResponse>,
    ) -> Self {
        Self {
            kind: ObservationKind::ChatModel(ChatModelObservation { request, response }),
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ObservationKind {
        &self.kind
    }

    /// Returns the chat payload when this is a chat-model observation.
    pub fn as_chat(&self) -> Option<&ChatModelObservation> {
        match &self.kind {
            ObservationKind::ChatModel(chat) => Some(chat),
            ObservationKind::Other => None,
        }
    }

    /// Adds a low-cardinality key-value, replacing any value under the same key.
    pub fn add_low_cardinality_key_value(&mut self, kv: KeyValue) -> &mut Self {
        upsert(&mut self.low_cardinality, kv);
        self
    }

    /// Adds a high-cardinality key-value, replacing any value under the same key.
    pub fn add_high_cardinality_key_value(&mut self, kv: KeyValue) -> &mut Self {
        upsert(&mut self.high_cardinality, kv);
        self
    }

    pub fn low_cardinality_key_values(&self) -> &[KeyValue] {
        &self.low_cardinality
    }

    pub fn high_cardinality_key_values(&self) -> &[KeyValue] {
        &self.high_cardinality
    }

    /// Looks up a high-cardinality value by key name.
    pub fn high_cardinality_value(&self, key: &str) -> Option<String> {
        self.high_cardinality
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| kv.value.as_str().into_owned())
    }
}

fn upsert(values: &mut Vec<KeyValue>, kv: KeyValue) {
    match values.iter_mut().find(|existing| existing.key == kv.key) {
        Some(existing) => *existing = kv,
        None => values.push(kv),
    }
}
