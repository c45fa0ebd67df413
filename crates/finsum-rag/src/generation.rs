//! Summary generation via the Ollama chat API.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Longest slice of an error body kept in [`GenerationError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Produces a completion for a prompt.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str)
        -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Non-streaming client for `POST {base}/api/chat`.
///
/// Sends a single user message and waits for the full response. No retries:
/// failures go straight back to the caller.
pub struct OllamaChatClient {
    client: reqwest::Client,
    url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

impl OllamaChatClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str, model: &str) -> Self {
        Self {
            client,
            url: format!("{}/api/chat", base_url.trim_end_matches('/')),
            model: model.to_string(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as a single user message and return the reply content.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Http`] on network failure.
    /// - [`GenerationError::Status`] on any non-2xx status.
    /// - [`GenerationError::Malformed`] if the body is not JSON or lacks
    ///   `message.content`.
    pub async fn chat(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "sending generation request"
        );

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| GenerationError::Malformed(e.to_string()))?;

        tracing::info!(
            model = %self.model,
            summary_chars = parsed.message.content.chars().count(),
            "summary generated"
        );
        Ok(parsed.message.content)
    }
}

impl TextGenerator for OllamaChatClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.chat(prompt).await
    }
}
