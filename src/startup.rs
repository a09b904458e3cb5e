//! Boot-time hook that writes one poem.

use crate::ai_service::PoemService;
use crate::chat::ChatModel;
use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};

/// Topic passed to the poem service at startup.
pub const STARTUP_POEM_TOPIC: &str = "LangFuse";

/// Line count passed to the poem service at startup.
pub const STARTUP_POEM_LINES: u32 = 4;

/// Fires [`PoemService::write_a_poem`] once per process start.
#[derive(Debug, Default)]
pub struct StartupHook {
    fired: AtomicBool,
}

impl StartupHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the startup poem and prints it to stdout.
    ///
    /// Only the first call reaches the service; later calls return `Ok(None)`.
    /// Service errors are returned as-is.
    pub async fn fire<M: ChatModel>(&self, service: &PoemService<M>) -> Result<Option<String>> {
        if self.fired.swap(true, Ordering::SeqCst) {
            tracing::debug!("startup hook already fired");
            return Ok(None);
        }

        let poem = service
            .write_a_poem(STARTUP_POEM_TOPIC, STARTUP_POEM_LINES)
            .await?;
        println!("{poem}");

        Ok(Some(poem))
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{ChatRequest, ChatResponse, Generation};
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingModel {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatModel for CountingModel {
        async fn call(&self, request: &ChatRequest) -> Result<ChatResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let prompt = &request.instructions[1].text;
            Ok(ChatResponse::new(vec![Generation::text(format!("re: {prompt}"))]))
        }

        fn system(&self) -> &'static str {
            "counting"
        }

        fn default_model(&self) -> &str {
            "counting-model"
        }
    }

    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn call(&self, _request: &ChatRequest) -> Result<ChatResponse> {
            Err(Error::Provider {
                provider: "failing",
                status: 503,
                body: "unavailable".to_string(),
            })
        }

        fn system(&self) -> &'static str {
            "failing"
        }

        fn default_model(&self) -> &str {
            "failing-model"
        }
    }

    #[tokio::test]
    async fn test_fires_once() {
        let hook = StartupHook::new();
        let service = PoemService::new(CountingModel::default());

        let first = hook.fire(&service).await.unwrap();
        assert_eq!(
            first.as_deref(),
            Some("re: Write a poem about LangFuse. The poem should be 4 lines long.")
        );
        assert!(hook.has_fired());

        let second = hook.fire(&service).await.unwrap();
        assert!(second.is_none());
        assert_eq!(service.model().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_is_returned() {
        let hook = StartupHook::new();
        let result = hook.fire(&PoemService::new(FailingModel)).await;
        assert!(matches!(result, Err(Error::Provider { status: 503, .. })));
    }
}
