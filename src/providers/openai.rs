use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, error};

use super::{ChatMessage, ChatRequest, ChatResponse, ProviderClient, Usage};
use crate::config::LlmConfig;
use crate::error::{ChatbotError, ChatbotResult};

/// Client for OpenAI-compatible `/v1/chat/completions` endpoints with tool calling.
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIClient {
    pub fn from_config(config: &LlmConfig) -> ChatbotResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ChatbotError::provider("OPENAI_API_KEY environment variable not set"))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn with_api_key(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
        }
    }

    fn build_payload(&self, request: &ChatRequest) -> Value {
        let mut payload = json!({
            "model": request.model.as_deref().unwrap_or(self.get_default_model()),
            "messages": request.messages,
            "temperature": request.temperature.unwrap_or(0.2),
        });

        if let Some(max_tokens) = request.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }
        if !request.tools.is_empty() {
            payload["tools"] = Value::Array(request.tools.iter().map(|t| t.to_openai()).collect());
            payload["tool_choice"] = json!("auto");
        }

        payload
    }
}

#[async_trait]
impl ProviderClient for OpenAIClient {
    async fn chat_completion(&self, request: &ChatRequest) -> ChatbotResult<ChatResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let payload = self.build_payload(request);

        debug!("Sending request to OpenAI: {} ({} tools)", url, request.tools.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("OpenAI API error: {}", error_text);
            return Err(ChatbotError::provider(format!("OpenAI API error: {}", error_text)));
        }

        let response_json: Value = response.json().await?;
        parse_completion(response_json, self.get_default_model())
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn get_default_model(&self) -> &str {
        &self.model
    }
}

fn parse_completion(mut response_json: Value, default_model: &str) -> ChatbotResult<ChatResponse> {
    let message_json = response_json
        .pointer_mut("/choices/0/message")
        .map(Value::take)
        .ok_or_else(|| ChatbotError::provider("OpenAI response contained no choices"))?;
    let message: ChatMessage = serde_json::from_value(message_json)?;

    let model = response_json["model"]
        .as_str()
        .unwrap_or(default_model)
        .to_string();

    let usage = response_json.get("usage").map(|usage_data| Usage {
        prompt_tokens: usage_data["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        completion_tokens: usage_data["completion_tokens"].as_u64().unwrap_or(0) as u32,
        total_tokens: usage_data["total_tokens"].as_u64().unwrap_or(0) as u32,
    });

    Ok(ChatResponse {
        message,
        model,
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Role, ToolDefinition};

    #[test]
    fn parses_tool_call_response() {
        let body = json!({
            "model": "gpt-4o-2024",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "getCounter", "arguments": "{}" }
                    }]
                }
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13 }
        });

        let response = parse_completion(body, "gpt-4o").unwrap();
        assert_eq!(response.model, "gpt-4o-2024");
        assert_eq!(response.message.role, Role::Assistant);
        assert_eq!(response.message.tool_calls.len(), 1);
        assert_eq!(response.message.tool_calls[0].function.name, "getCounter");
        assert_eq!(response.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn payload_includes_tools_only_when_present() {
        let client = OpenAIClient::with_api_key("sk-test".to_string());
        let mut request = ChatRequest {
            messages: vec![ChatMessage::user("hi")],
            tools: Vec::new(),
            model: None,
            temperature: None,
            max_tokens: None,
        };
        assert!(client.build_payload(&request).get("tools").is_none());

        request.tools.push(ToolDefinition {
            name: "getCounter".to_string(),
            description: "read the counter".to_string(),
            parameters: json!({ "type": "object", "properties": {} }),
        });
        let payload = client.build_payload(&request);
        assert_eq!(payload["tools"][0]["function"]["name"], "getCounter");
        assert_eq!(payload["model"], "gpt-4o");
    }
}
