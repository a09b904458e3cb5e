//! Telemetry key names attached to chat-model observations.
//!
//! [`HighCardinalityKeyName`] is the closed set of free-text attributes the
//! content filter writes. [`GenAiAttributes`] holds the low-cardinality
//! OpenTelemetry GenAI semantic convention names the observed model sets.
//! See: <https://opentelemetry.io/docs/specs/semconv/gen-ai/>

use opentelemetry::KeyValue;
use std::fmt;

/// High-cardinality attribute names carrying prompt and completion text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighCardinalityKeyName {
    /// Joined prompt instructions.
    Prompt,
    /// Joined completion texts.
    Completion,
}

impl HighCardinalityKeyName {
    /// All key names, in attachment order.
    pub const ALL: [HighCardinalityKeyName; 2] = [Self::Prompt, Self::Completion];

    /// Returns the wire name of the attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prompt => "gen_ai.prompt",
            Self::Completion => "gen_ai.completion",
        }
    }

    /// Builds a key-value pair for this name.
    pub fn with_value(self, value: impl Into<String>) -> KeyValue {
        KeyValue::new(self.as_str(), value.into())
    }
}

impl fmt::Display for HighCardinalityKeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OpenTelemetry GenAI semantic convention attributes.
pub struct GenAiAttributes;

impl GenAiAttributes {
    /// The type of GenAI operation
    pub const OPERATION_NAME: &'static str = "gen_ai.operation.name";

    /// The GenAI system being used (e.g., "openai", "gcp.gen_ai")
    pub const SYSTEM: &'static str = "gen_ai.system";

    /// The name of the model requested
    pub const REQUEST_MODEL: &'static str = "gen_ai.request.model";

    /// Temperature setting for the model
    pub const REQUEST_TEMPERATURE: &'static str = "gen_ai.request.temperature";

    /// The model that actually answered
    pub const RESPONSE_MODEL: &'static str = "gen_ai.response.model";

    /// Finish reasons for the response
    pub const RESPONSE_FINISH_REASONS: &'static str = "gen_ai.response.finish_reasons";

    /// Number of tokens in the prompt
    pub const USAGE_INPUT_TOKENS: &'static str = "gen_ai.usage.input_tokens";

    /// Number of tokens in the completion
    pub const USAGE_OUTPUT_TOKENS: &'static str = "gen_ai.usage.output_tokens";

    /// Operation name value for chat completions.
    pub const OPERATION_CHAT: &'static str = "chat";
}
