//! Prompt-templated AI service on top of a [`ChatModel`].

use crate::chat::ChatModel;
use crate::observation::{ChatRequest, Instruction};
use crate::{Error, Result};

const POET_SYSTEM_MESSAGE: &str = "You are a professional poet";

/// Writes poems with whatever chat model it was given.
#[derive(Clone, Debug)]
pub struct PoemService<M> {
    model: M,
}

impl<M: ChatModel> PoemService<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Builds the request sent for [`write_a_poem`](Self::write_a_poem).
    pub fn poem_request(topic: &str, lines: u32) -> ChatRequest {
        ChatRequest::new(vec![
            Instruction::system(POET_SYSTEM_MESSAGE),
            Instruction::user(format!(
                "Write a poem about {topic}. The poem should be {lines} lines long."
            )),
        ])
    }

    /// Asks the model for a poem of `lines` lines about `topic`.
    ///
    /// # Errors
    ///
    /// Propagates model errors; returns [`Error::EmptyCompletion`] when the
    /// first generation carries no text.
    pub async fn write_a_poem(&self, topic: &str, lines: u32) -> Result<String> {
        let response = self.model.call(&Self::poem_request(topic, lines)).await?;

        response
            .result()
            .and_then(|generation| generation.output_text())
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or(Error::EmptyCompletion)
    }
}
