//! Language-model provider abstraction
//!
//! A single trait over chat-completion backends plus a logging wrapper. The
//! dispatcher sends the whole shared transcript on every call.

mod error;
mod openai;

pub use error::{LlmError, LlmErrorKind};
pub use openai::OpenAiService;

use crate::transcript::ChatMessage;
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for completion backends
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Complete the conversation, producing the next assistant reply
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, LlmError>;

    /// Get the model name
    fn model_id(&self) -> &str;
}

/// Logging wrapper for completion backends
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(messages, max_tokens).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    history_len = messages.len(),
                    reply_chars = reply.len(),
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
