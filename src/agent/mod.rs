//! ReAct-style loop: the model either answers or asks for tools, tool results
//! are fed back, and the conversation is kept in memory for the whole session.

use alloy_primitives::Address;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ChatbotError, ChatbotResult};
use crate::providers::{ChatMessage, ChatRequest, ProviderClient};
use crate::tools::{ToolOutput, ToolRegistry};

pub const AUTONOMOUS_PROMPT: &str =
    "Perform an interesting on-chain action with the provided contract.";

pub fn system_prompt(contract: Address, network: &str) -> String {
    format!(
        "You are a high-precision on-chain agent. Your primary role is to interface directly with \
         an Ethereum smart contract deployed at {contract} on the {network} network. This contract \
         supports ETH and ERC20 deposits and withdrawals, counter management and balance inquiries, \
         each exposed to you as a tool with a typed argument schema.\n\n\
         Validate user inputs before calling a tool. ETH amounts are decimal ETH (the tool converts \
         to Wei); ERC20 amounts are raw integers in the token's smallest unit. Never reveal private \
         keys or other sensitive wallet data. After every transaction report the transaction hash \
         and its status. Use getWalletDetails when asked about your own address or balance. Always \
         confirm you are operating on {network}."
    )
}

#[derive(Debug, Clone)]
pub struct ToolExecution {
    pub name: String,
    pub output: ToolOutput,
}

#[derive(Debug, Clone)]
pub struct AgentReply {
    pub content: String,
    pub tool_executions: Vec<ToolExecution>,
}

pub struct Agent {
    provider: Arc<dyn ProviderClient>,
    tools: ToolRegistry,
    history: Vec<ChatMessage>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tool_rounds: usize,
}

impl Agent {
    pub fn new(provider: Arc<dyn ProviderClient>, tools: ToolRegistry, system_prompt: String) -> Self {
        Self {
            provider,
            tools,
            history: vec![ChatMessage::system(system_prompt)],
            model: None,
            temperature: None,
            max_tool_rounds: 8,
        }
    }

    pub fn with_model<T: Into<String>>(mut self, model: T) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds.max(1);
        self
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub async fn respond(&mut self, input: &str) -> ChatbotResult<AgentReply> {
        self.history.push(ChatMessage::user(input));
        let definitions = self.tools.definitions();
        let mut tool_executions = Vec::new();

        for round in 0..self.max_tool_rounds {
            let request = ChatRequest {
                messages: self.history.clone(),
                tools: definitions.clone(),
                model: self.model.clone(),
                temperature: self.temperature,
                max_tokens: None,
            };

            let response = self.provider.chat_completion(&request).await?;
            let message = response.message;
            debug!(
                "Round {}: {} tool call(s) from {}",
                round,
                message.tool_calls.len(),
                response.model
            );
            self.history.push(message.clone());

            if message.tool_calls.is_empty() {
                return Ok(AgentReply {
                    content: message.content.unwrap_or_default(),
                    tool_executions,
                });
            }

            for call in &message.tool_calls {
                let output = self
                    .tools
                    .invoke(&call.function.name, Value::String(call.function.arguments.clone()))
                    .await;
                info!(
                    "🔧 {} -> {}",
                    call.function.name,
                    if output.success { "ok" } else { "failed" }
                );
                self.history
                    .push(ChatMessage::tool_result(call.id.clone(), output.to_message()));
                tool_executions.push(ToolExecution {
                    name: call.function.name.clone(),
                    output,
                });
            }
        }

        Err(ChatbotError::provider(format!(
            "model kept requesting tools after {} rounds",
            self.max_tool_rounds
        )))
    }
}
