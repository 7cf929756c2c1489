use serde::{Deserialize, Serialize};

use super::provider::{ChatMessage, ChatOutput, ChatRequest, LlmError, LlmProvider, LlmResult};
use crate::http::client::HttpClient;

/// Chat-completions client for OpenRouter or any OpenAI-compatible endpoint.
///
/// The API key is held by the provider and sent with each request; a missing
/// key produces unauthenticated requests that the endpoint is expected to reject.
#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    http: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

impl OpenRouterProvider {
    pub fn new(http: HttpClient, api_key: Option<String>, base_url: String) -> Self {
        let api_key = api_key.filter(|v| !v.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("no OpenRouter API key configured, requests will be unauthenticated");
        }

        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(request: &ChatRequest) -> CompletionRequest<'_> {
        CompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            stop: &request.stop,
        }
    }

    fn extract_text(resp: CompletionResponse) -> LlmResult<String> {
        if let Some(error) = resp.error {
            return Err(LlmError::Upstream(error.message));
        }

        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

impl LlmProvider for OpenRouterProvider {
    async fn generate(&self, request: ChatRequest) -> LlmResult<ChatOutput> {
        let payload = Self::build_request(&request);
        let resp = self
            .http
            .post_json(&self.endpoint(), self.api_key.as_deref(), &payload)
            .await
            .map_err(|err| {
                if err.is_builder() {
                    LlmError::InvalidRequest(err.to_string())
                } else {
                    LlmError::Transport(err.to_string())
                }
            })?;

        if !(200..300).contains(&resp.status) {
            let body = resp.body.chars().take(400).collect::<String>();
            return Err(LlmError::HttpStatus {
                status: resp.status,
                body,
            });
        }

        let parsed = serde_json::from_str::<CompletionResponse>(&resp.body)
            .map_err(|err| LlmError::Parse(err.to_string()))?;
        let text = Self::extract_text(parsed)?;
        Ok(ChatOutput { text })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    error: Option<CompletionError>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionError {
    message: String,
}
