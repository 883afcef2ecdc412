use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::chain::WalletInfo;
use crate::contract::Operation;
use crate::dispatch::Dispatcher;
use crate::error::{ChatbotError, ChatbotResult};
use crate::providers::ToolDefinition;

pub mod contract;
pub mod wallet;

pub use contract::ContractTool;
pub use wallet::{WALLET_TOOL_DESCRIPTION, WALLET_TOOL_NAME, WalletTool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub content: String,
    pub error: Option<String>,
}

impl ToolOutput {
    pub fn ok<T: Into<String>>(content: T) -> Self {
        Self {
            success: true,
            content: content.into(),
            error: None,
        }
    }

    pub fn failed(error: &ChatbotError) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(format!("[{}] {}", error.kind(), error)),
        }
    }

    /// Text handed back to the model as the tool message.
    pub fn to_message(&self) -> String {
        match &self.error {
            Some(error) if !self.success => format!("Error: {}", error),
            _ => self.content.clone(),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    async fn execute(&self, args: Value) -> ChatbotResult<ToolOutput>;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON Schema of the argument object.
    fn parameters(&self) -> Value;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Fixed set of tools, built once at startup.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        let tools = Operation::ALL
            .into_iter()
            .map(|operation| Box::new(ContractTool::new(operation, dispatcher.clone())) as Box<dyn Tool>)
            .collect();

        Self { tools }
    }

    /// Add the read-only `getWalletDetails` tool for the agent's own account.
    pub fn with_wallet<T: Into<String>>(mut self, wallet: Arc<dyn WalletInfo>, network: T) -> Self {
        self.tools.push(Box::new(WalletTool::new(wallet, network)));
        self
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn execute_tool(&self, tool_name: &str, args: Value) -> ChatbotResult<ToolOutput> {
        for tool in &self.tools {
            if tool.name() == tool_name {
                return tool.execute(args).await;
            }
        }

        Err(ChatbotError::unknown_operation(tool_name))
    }

    /// Like `execute_tool`, but failures become an unsuccessful `ToolOutput`
    /// so the conversation can carry on.
    pub async fn invoke(&self, tool_name: &str, args: Value) -> ToolOutput {
        info!("🔧 Tool call: {}", tool_name);
        match self.execute_tool(tool_name, args).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool {} failed: {}", tool_name, e);
                ToolOutput::failed(&e)
            }
        }
    }

    pub fn list_tools(&self) -> Vec<(&str, &str)> {
        self.tools.iter().map(|tool| (tool.name(), tool.description())).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }
}
