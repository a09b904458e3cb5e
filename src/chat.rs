//! The chat-model capability.

use crate::observation::{ChatRequest, ChatResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A chat-completion backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the request and waits for the full response.
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Value reported as `gen_ai.system`.
    fn system(&self) -> &'static str;

    /// Model used when the request does not name one.
    fn default_model(&self) -> &str;
}

#[async_trait]
impl<M: ChatModel + ?Sized> ChatModel for Arc<M> {
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse> {
        (**self).call(request).await
    }

    fn system(&self) -> &'static str {
        (**self).system()
    }

    fn default_model(&self) -> &str {
        (**self).default_model()
    }
}

/// Sends a prepared request and decodes a JSON body, turning non-2xx answers
/// into [`Error::Provider`].
pub(crate) async fn send_json<R: DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<R> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(provider, status = status.as_u16(), "chat model request failed");
        return Err(Error::Provider {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<R>().await?)
}
