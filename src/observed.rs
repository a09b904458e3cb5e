//! Chat model instrumentation.
//!
//! [`ObservedChatModel`] wraps any [`ChatModel`] and records each call as an
//! OpenTelemetry client span. After the delegate returns, it builds a chat
//! [`ObservationContext`], runs it through the registered
//! [`ObservationFilter`]s and copies the resulting key-values onto the span,
//! where the Langfuse exporter picks them up.

use crate::chat::ChatModel;
use crate::filter::ObservationFilter;
use crate::key_names::GenAiAttributes;
use crate::observation::{ChatRequest, ChatResponse, ObservationContext};
use crate::Result;
use async_trait::async_trait;
use opentelemetry::trace::{Span, SpanKind, Status, Tracer};
use opentelemetry::KeyValue;
use std::sync::Arc;

/// A [`ChatModel`] that traces every call.
pub struct ObservedChatModel<M, T> {
    delegate: M,
    tracer: T,
    filters: Vec<Arc<dyn ObservationFilter>>,
}

impl<M, T> ObservedChatModel<M, T>
where
    M: ChatModel,
    T: Tracer + Send + Sync,
    T::Span: Send + Sync + 'static,
{
    pub fn new(delegate: M, tracer: T) -> Self {
        Self {
            delegate,
            tracer,
            filters: Vec::new(),
        }
    }

    /// Appends a filter. Filters run in registration order.
    pub fn with_filter(mut self, filter: impl ObservationFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn delegate(&self) -> &M {
        &self.delegate
    }

    fn observe(
        &self,
        name: String,
        request: &ChatRequest,
        response: Option<&ChatResponse>,
    ) -> ObservationContext {
        let mut context = ObservationContext::chat(name, request.clone(), response.cloned());

        if let Some(response) = response {
            if let Some(model) = &response.model {
                context.add_low_cardinality_key_value(KeyValue::new(
                    GenAiAttributes::RESPONSE_MODEL,
                    model.clone(),
                ));
            }
            let finish_reasons: Vec<&str> = response
                .results
                .iter()
                .filter_map(|g| g.finish_reason.as_deref())
                .collect();
            if !finish_reasons.is_empty() {
                context.add_low_cardinality_key_value(KeyValue::new(
                    GenAiAttributes::RESPONSE_FINISH_REASONS,
                    finish_reasons.join(","),
                ));
            }
            if let Some(usage) = response.usage {
                context
                    .add_low_cardinality_key_value(KeyValue::new(
                        GenAiAttributes::USAGE_INPUT_TOKENS,
                        i64::try_from(usage.input_tokens).unwrap_or(i64::MAX),
                    ))
                    .add_low_cardinality_key_value(KeyValue::new(
                        GenAiAttributes::USAGE_OUTPUT_TOKENS,
                        i64::try_from(usage.output_tokens).unwrap_or(i64::MAX),
                    ));
            }
        }

        self.filters
            .iter()
            .fold(context, |context, filter| filter.map(context))
    }
}

#[async_trait]
impl<M, T> ChatModel for ObservedChatModel<M, T>
where
    M: ChatModel,
    T: Tracer + Send + Sync,
    T::Span: Send + Sync + 'static,
{
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let model = request
            .model
            .as_deref()
            .unwrap_or_else(|| self.delegate.default_model())
            .to_string();
        let name = format!("{} {}", GenAiAttributes::OPERATION_CHAT, model);

        let mut attributes = vec![
            KeyValue::new(GenAiAttributes::OPERATION_NAME, GenAiAttributes::OPERATION_CHAT),
            KeyValue::new(GenAiAttributes::SYSTEM, self.delegate.system()),
            KeyValue::new(GenAiAttributes::REQUEST_MODEL, model),
        ];
        if let Some(temperature) = request.temperature {
            attributes.push(KeyValue::new(GenAiAttributes::REQUEST_TEMPERATURE, temperature));
        }

        let mut span = self
            .tracer
            .span_builder(name.clone())
            .with_kind(SpanKind::Client)
            .with_attributes(attributes)
            .start(&self.tracer);

        let result = self.delegate.call(request).await;

        let context = self.observe(name, request, result.as_ref().ok());
        for kv in context.low_cardinality_key_values() {
            span.set_attribute(kv.clone());
        }
        for kv in context.high_cardinality_key_values() {
            span.set_attribute(kv.clone());
        }

        match &result {
            Ok(_) => span.set_status(Status::Ok),
            Err(error) => {
                tracing::warn!(error = %error, "chat model call failed");
                span.set_status(Status::error(error.to_string()));
            }
        }
        span.end();

        result
    }

    fn system(&self) -> &'static str {
        self.delegate.system()
    }

    fn default_model(&self) -> &str {
        self.delegate.default_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ChatContentObservationFilter;
    use crate::observation::{Generation, Instruction, TokenUsage};
    use crate::Error;
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};

    struct FixedModel(Result<ChatResponse>);

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn call(&self, _request: &ChatRequest) -> Result<ChatResponse> {
            match &self.0 {
                Ok(response) => Ok(response.clone()),
                Err(_) => Err(Error::EmptyCompletion),
            }
        }

        fn system(&self) -> &'static str {
            "fixed"
        }

        fn default_model(&self) -> &str {
            "fixed-1"
        }
    }

    fn provider() -> (SdkTracerProvider, InMemorySpanExporter) {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        (provider, exporter)
    }

    fn attribute(span: &opentelemetry_sdk::trace::SpanData, key: &str) -> Option<String> {
        span.attributes
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| kv.value.as_str().into_owned())
    }

    #[tokio::test]
    async fn test_records_prompt_and_completion() {
        let (provider, exporter) = provider();
        let mut response = ChatResponse::new(vec![Generation::text("Roses")]);
        response.usage = Some(TokenUsage {
            input_tokens: 7,
            output_tokens: 2,
        });

        let model = ObservedChatModel::new(FixedModel(Ok(response)), provider.tracer("test"))
            .with_filter(ChatContentObservationFilter);

        let request = ChatRequest::new(vec![
            Instruction::system("be brief"),
            Instruction::user("a flower"),
        ]);
        model.call(&request).await.unwrap();

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        let span = &spans[0];

        assert_eq!(span.name, "chat fixed-1");
        assert_eq!(attribute(span, "gen_ai.system").as_deref(), Some("fixed"));
        assert_eq!(
            attribute(span, "gen_ai.prompt").as_deref(),
            Some("[\"be brief\", \"a flower\"]")
        );
        assert_eq!(
            attribute(span, "gen_ai.completion").as_deref(),
            Some("[\"Roses\"]")
        );
        assert_eq!(
            attribute(span, "gen_ai.usage.input_tokens").as_deref(),
            Some("7")
        );
        assert_eq!(span.status, Status::Ok);
    }

    #[tokio::test]
    async fn test_failed_call_still_records_prompt() {
        let (provider, exporter) = provider();
        let model = ObservedChatModel::new(
            FixedModel(Err(Error::EmptyCompletion)),
            provider.tracer("test"),
        )
        .with_filter(ChatContentObservationFilter);

        let request = ChatRequest::new(vec![Instruction::user("hi")]).with_model("fixed-2");
        assert!(model.call(&request).await.is_err());

        let spans = exporter.get_finished_spans().unwrap();
        let span = &spans[0];
        assert_eq!(span.name, "chat fixed-2");
        assert_eq!(attribute(span, "gen_ai.prompt").as_deref(), Some("[\"hi\"]"));
        assert_eq!(attribute(span, "gen_ai.completion").as_deref(), Some("[]"));
        assert!(matches!(span.status, Status::Error { .. }));
    }

    #[tokio::test]
    async fn test_token_usage_saturates() {
        let (provider, exporter) = provider();
        let mut response = ChatResponse::new(vec![Generation::text("x")]);
        response.usage = Some(TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: 5,
        });
        let model = ObservedChatModel::new(FixedModel(Ok(response)), provider.tracer("test"));

        model.call(&ChatRequest::default()).await.unwrap();

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(
            attribute(&spans[0], "gen_ai.usage.input_tokens"),
            Some(i64::MAX.to_string())
        );
        assert_eq!(
            attribute(&spans[0], "gen_ai.usage.output_tokens").as_deref(),
            Some("5")
        );
    }

    #[tokio::test]
    async fn test_without_filters_no_content_attributes() {
        let (provider, exporter) = provider();
        let model = ObservedChatModel::new(
            FixedModel(Ok(ChatResponse::new(vec![Generation::text("x")]))),
            provider.tracer("test"),
        );

        model.call(&ChatRequest::default()).await.unwrap();

        let spans = exporter.get_finished_spans().unwrap();
        assert!(attribute(&spans[0], "gen_ai.prompt").is_none());
        assert!(attribute(&spans[0], "gen_ai.completion").is_none());
    }
}
