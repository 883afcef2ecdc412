use alloy_primitives::utils::format_ether;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use super::{Tool, ToolOutput};
use crate::chain::WalletInfo;
use crate::dispatch::ToolInvocationRequest;
use crate::error::{ChatbotError, ChatbotResult};

pub const WALLET_TOOL_NAME: &str = "getWalletDetails";
pub const WALLET_TOOL_DESCRIPTION: &str =
    "Get the agent wallet's address, network, chain id and native ETH balance (no arguments).";

/// Lets the agent answer questions about its own account.
pub struct WalletTool {
    wallet: Arc<dyn WalletInfo>,
    network: String,
}

impl WalletTool {
    pub fn new<T: Into<String>>(wallet: Arc<dyn WalletInfo>, network: T) -> Self {
        Self {
            wallet,
            network: network.into(),
        }
    }
}

#[async_trait]
impl Tool for WalletTool {
    async fn execute(&self, args: Value) -> ChatbotResult<ToolOutput> {
        let request = ToolInvocationRequest::from_value(WALLET_TOOL_NAME, args)?;
        if let Some(unexpected) = request.arguments.keys().next() {
            return Err(ChatbotError::invalid_argument(format!(
                "{} does not take an argument named '{}'",
                WALLET_TOOL_NAME, unexpected
            )));
        }

        let address = self.wallet.address();
        let chain_id = self.wallet.chain_id();
        let balance = self
            .wallet
            .balance()
            .await
            .map_err(|e| ChatbotError::read_failed(format!("wallet balance: {}", e)))?;

        let summary = format!(
            "Wallet {} on {} (chain id {}) holds {} ETH",
            address,
            self.network,
            chain_id,
            format_ether(balance)
        );
        let content = json!({
            "summary": summary,
            "result": {
                "address": address.to_string(),
                "network": self.network,
                "chain_id": chain_id,
                "balance_wei": balance.to_string(),
            }
        });
        Ok(ToolOutput::ok(content.to_string()))
    }

    fn name(&self) -> &str {
        WALLET_TOOL_NAME
    }

    fn description(&self) -> &str {
        WALLET_TOOL_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": [],
            "additionalProperties": false,
        })
    }
}
