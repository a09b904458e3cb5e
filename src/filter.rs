//! Observation filters.
//!
//! A filter sees every [`ObservationContext`] before it is recorded and may
//! attach key-values to it. [`ChatContentObservationFilter`] extracts the
//! prompt and completion text of chat-model calls so Langfuse can show them as
//! the generation's input and output.

use crate::key_names::HighCardinalityKeyName;
use crate::observation::{ChatModelObservation, ObservationContext};

/// Maps an observation context before it is recorded.
pub trait ObservationFilter: Send + Sync {
    fn map(&self, context: ObservationContext) -> ObservationContext;
}

/// Attaches `gen_ai.prompt` and `gen_ai.completion` to chat-model observations.
///
/// Non-chat contexts are returned untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChatContentObservationFilter;

impl ChatContentObservationFilter {
    pub fn new() -> Self {
        Self
    }
}

impl ObservationFilter for ChatContentObservationFilter {
    fn map(&self, mut context: ObservationContext) -> ObservationContext {
        let Some(chat) = context.as_chat() else {
            return context;
        };

        let prompts = concatenate_strings(&process_prompts(chat));
        let completions = concatenate_strings(&process_completions(chat));

        context
            .add_high_cardinality_key_value(HighCardinalityKeyName::Prompt.with_value(prompts))
            .add_high_cardinality_key_value(
                HighCardinalityKeyName::Completion.with_value(completions),
            );

        context
    }
}

fn process_prompts(chat: &ChatModelObservation) -> Vec<&str> {
    chat.request
        .instructions
        .iter()
        .map(|instruction| instruction.text.as_str())
        .collect()
}

// Only the first result's text decides whether anything is reported; the
// per-result filter below then skips blank results after it.
fn process_completions(chat: &ChatModelObservation) -> Vec<&str> {
    let Some(response) = &chat.response else {
        return Vec::new();
    };
    let Some(first) = response.result() else {
        return Vec::new();
    };
    if !has_text(first.output_text()) {
        return Vec::new();
    }

    response
        .results
        .iter()
        .filter_map(|generation| generation.output_text())
        .filter(|text| has_text(Some(text)))
        .collect()
}

fn has_text(text: Option<&str>) -> bool {
    text.is_some_and(|t| t.chars().any(|c| !is_blank_char(c)))
}

// Space separators and line/paragraph separators except the no-break spaces,
// plus the ASCII control separators. Unlike `char::is_whitespace`, U+00A0 and
// U+0085 count as text and U+001C..=U+001F count as blank.
fn is_blank_char(c: char) -> bool {
    matches!(
        c,
        '\t'..='\r'
            | '\u{1C}'..='\u{1F}'
            | ' '
            | '\u{1680}'
            | '\u{2000}'..='\u{2006}'
            | '\u{2008}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Joins strings as `["a", "b"]`: each item quoted, comma-separated, bracketed.
///
/// An empty slice yields `[]`.
pub fn concatenate_strings<S: AsRef<str>>(strings: &[S]) -> String {
    let quoted: Vec<String> = strings
        .iter()
        .map(|s| format!("\"{}\"", s.as_ref()))
        .collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{
        AssistantMessage, ChatRequest, ChatResponse, Generation, Instruction,
    };
    use opentelemetry::KeyValue;

    fn chat_context(instructions: &[&str], response: Option<ChatResponse>) -> ObservationContext {
        let request = ChatRequest::new(
            instructions
                .iter()
                .map(|text| Instruction::user(*text))
                .collect(),
        );
        ObservationContext::chat("chat test-model", request, response)
    }

    fn prompt(context: &ObservationContext) -> String {
        context
            .high_cardinality_value(HighCardinalityKeyName::Prompt.as_str())
            .unwrap()
    }

    fn completion(context: &ObservationContext) -> String {
        context
            .high_cardinality_value(HighCardinalityKeyName::Completion.as_str())
            .unwrap()
    }

    #[test]
    fn test_concatenate_strings() {
        assert_eq!(concatenate_strings::<&str>(&[]), "[]");
        assert_eq!(concatenate_strings(&["a"]), "[\"a\"]");
        assert_eq!(concatenate_strings(&["a", "b"]), "[\"a\", \"b\"]");
        assert_eq!(concatenate_strings(&[""]), "[\"\"]");
    }

    #[test]
    fn test_non_chat_context_passes_through() {
        let mut context = ObservationContext::new("http.server.requests");
        context.add_low_cardinality_key_value(KeyValue::new("method", "GET"));
        let before = context.clone();

        let after = ChatContentObservationFilter::new().map(context);

        assert_eq!(after, before);
        assert!(after.high_cardinality_key_values().is_empty());
    }

    #[test]
    fn test_prompts_in_order() {
        let context = chat_context(&["a", "b"], None);
        let context = ChatContentObservationFilter.map(context);
        assert_eq!(prompt(&context), "[\"a\", \"b\"]");
    }

    #[test]
    fn test_empty_instructions() {
        let context = chat_context(&[], None);
        let context = ChatContentObservationFilter.map(context);
        assert_eq!(prompt(&context), "[]");
    }

    #[test]
    fn test_empty_instruction_text_is_kept() {
        let context = chat_context(&["", "b"], None);
        let context = ChatContentObservationFilter.map(context);
        assert_eq!(prompt(&context), "[\"\", \"b\"]");
    }

    #[test]
    fn test_no_response() {
        let context = chat_context(&["hi"], None);
        let context = ChatContentObservationFilter.map(context);
        assert_eq!(completion(&context), "[]");
    }

    #[test]
    fn test_empty_results() {
        let context = chat_context(&["hi"], Some(ChatResponse::new(Vec::new())));
        let context = ChatContentObservationFilter.map(context);
        assert_eq!(completion(&context), "[]");
    }

    #[test]
    fn test_blank_first_result_suppresses_all() {
        let response = ChatResponse::new(vec![
            Generation::text("   "),
            Generation::text("second"),
            Generation::text("third"),
        ]);
        let context = chat_context(&["hi"], Some(response));
        let context = ChatContentObservationFilter.map(context);
        assert_eq!(completion(&context), "[]");
    }

    #[test]
    fn test_first_result_without_output() {
        let response = ChatResponse::new(vec![Generation::default(), Generation::text("later")]);
        let context = chat_context(&["hi"], Some(response));
        let context = ChatContentObservationFilter.map(context);
        assert_eq!(completion(&context), "[]");
    }

    #[test]
    fn test_later_blank_results_are_skipped() {
        let response = ChatResponse::new(vec![
            Generation::text("one"),
            Generation::text(""),
            Generation::default(),
            Generation {
                output: Some(AssistantMessage::default()),
                finish_reason: None,
            },
            Generation::text("two"),
        ]);
        let context = chat_context(&["hi"], Some(response));
        let context = ChatContentObservationFilter.map(context);
        assert_eq!(completion(&context), "[\"one\", \"two\"]");
    }

    #[test]
    fn test_blank_characters() {
        assert!(!has_text(None));
        assert!(!has_text(Some("")));
        assert!(!has_text(Some(" \t\r\n")));
        assert!(!has_text(Some("\u{1F}\u{3000}\u{2028}")));
        assert!(has_text(Some("\u{A0}")));
        assert!(has_text(Some("\u{202F}")));
        assert!(has_text(Some("\u{85}")));
        assert!(has_text(Some("  x  ")));
    }

    #[test]
    fn test_no_break_space_first_result_is_reported() {
        let response = ChatResponse::new(vec![
            Generation::text("\u{A0}"),
            Generation::text("\u{1C}"),
            Generation::text("verse"),
        ]);
        let context = chat_context(&["hi"], Some(response));
        let context = ChatContentObservationFilter.map(context);
        assert_eq!(completion(&context), "[\"\u{A0}\", \"verse\"]");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let response = ChatResponse::new(vec![Generation::text("poem")]);
        let context = chat_context(&["write"], Some(response));
        let once = ChatContentObservationFilter.map(context);
        let twice = ChatContentObservationFilter.map(once.clone());

        assert_eq!(once, twice);
        assert_eq!(twice.high_cardinality_key_values().len(), 2);
    }
}
