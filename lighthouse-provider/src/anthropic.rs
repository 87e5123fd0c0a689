//! Anthropic Messages API client.
//!
//! Directly grounded in the teacher's `neuron-provider-anthropic::client::Anthropic`:
//! same header set, same default-model/base-url builder pattern, same
//! status-to-error mapping shape. Generalized here to also cover the
//! no-tools synthesis call and a separate embeddings endpoint.

use crate::error::ProviderError;
use crate::provider::{truncate_for_embedding, Provider};
use crate::types::{ChatRequest, ChatResponse, ContentPart, Role, StopReason, TokenUsage};
use async_trait::async_trait;
use serde_json::json;

const DEFAULT_CHAT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_EMBED_MODEL: &str = "voyage-3";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API plus a configurable embeddings
/// endpoint. Implements [`Provider`].
pub struct AnthropicProvider {
    api_key: String,
    chat_model: String,
    embed_model: String,
    base_url: String,
    embed_url: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a client with the given API key and sensible defaults.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            embed_url: format!("{DEFAULT_BASE_URL}/v1/embeddings"),
            client: reqwest::Client::new(),
        }
    }

    /// Override the chat model.
    #[must_use]
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Override the embedding model.
    #[must_use]
    pub fn embed_model(mut self, model: impl Into<String>) -> Self {
        self.embed_model = model.into();
        self
    }

    /// Override the API base URL (testing, proxies).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.embed_url = format!("{url}/v1/embeddings");
        self.base_url = url;
        self
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn to_api_request(&self, request: &ChatRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(to_api_message)
            .collect();

        let mut body = json!({
            "model": self.chat_model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "system": request.system,
            "messages": messages,
        });

        if !request.tools.is_empty() {
            let tools: Vec<serde_json::Value> = request
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "input_schema": t.input_schema,
                    })
                })
                .collect();
            body["tools"] = json!(tools);
        }

        body
    }
}

fn to_api_message(message: &crate::types::ProviderMessage) -> serde_json::Value {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "user",
    };
    let content: Vec<serde_json::Value> = message
        .content
        .iter()
        .map(|part| match part {
            ContentPart::Text { text } => json!({"type": "text", "text": text}),
            ContentPart::ToolUse { id, name, input } => {
                json!({"type": "tool_use", "id": id, "name": name, "input": input})
            }
            ContentPart::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => {
                json!({
                    "type": "tool_result",
                    "tool_use_id": tool_use_id,
                    "content": content,
                    "is_error": is_error,
                })
            }
        })
        .collect();
    json!({"role": role, "content": content})
}

fn from_api_response(json: &serde_json::Value) -> Result<ChatResponse, ProviderError> {
    let content_blocks = json["content"]
        .as_array()
        .ok_or_else(|| ProviderError::InvalidResponse("missing content array".to_string()))?;

    let mut content = Vec::with_capacity(content_blocks.len());
    for block in content_blocks {
        let block_type = block["type"].as_str().unwrap_or_default();
        match block_type {
            "text" => content.push(ContentPart::Text {
                text: block["text"].as_str().unwrap_or_default().to_string(),
            }),
            "tool_use" => content.push(ContentPart::ToolUse {
                id: block["id"].as_str().unwrap_or_default().to_string(),
                name: block["name"].as_str().unwrap_or_default().to_string(),
                input: block["input"].clone(),
            }),
            other => {
                tracing::debug!(block_type = other, "ignoring unrecognized content block");
            }
        }
    }

    let stop_reason = match json["stop_reason"].as_str() {
        Some("tool_use") => StopReason::ToolUse,
        Some("max_tokens") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    };

    Ok(ChatResponse {
        content,
        stop_reason,
        usage: TokenUsage {
            input_tokens: json["usage"]["input_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["output_tokens"].as_u64().unwrap_or(0),
        },
        model: json["model"].as_str().unwrap_or_default().to_string(),
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(0)
    } else {
        ProviderError::RequestFailed(err.to_string())
    }
}

fn map_http_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthFailed(body.to_string()),
        429 => ProviderError::RateLimited,
        _ => ProviderError::RequestFailed(format!("{status}: {body}")),
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = self.messages_url();
        let body = self.to_api_request(&request);

        tracing::debug!(url = %url, model = %self.chat_model, "sending chat request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(map_http_status(status, &text));
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON: {e}")))?;

        from_api_response(&json)
    }

    async fn chat_no_tools(
        &self,
        system: &str,
        user_message: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            messages: vec![crate::types::ProviderMessage::user(user_message)],
            tools: vec![],
            system: system.to_string(),
            temperature,
            max_tokens,
        };
        let response = self.chat(request).await?;
        Ok(response.text())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let truncated = truncate_for_embedding(text);

        let response = self
            .client
            .post(&self.embed_url)
            .header("x-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&json!({"model": self.embed_model, "input": truncated}))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(map_http_status(status, &text));
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON: {e}")))?;

        json["data"][0]["embedding"]
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_f64())
                    .map(|v| v as f32)
                    .collect()
            })
            .ok_or_else(|| ProviderError::InvalidResponse("missing embedding".to_string()))
    }
}
