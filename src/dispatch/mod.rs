use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::contract::{ContractCall, Operation};
use crate::error::{ChatbotError, ChatbotResult};

/// Read-only access to chain state (`eth_call`).
#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn call(&self, to: Address, data: Bytes) -> ChatbotResult<Bytes>;
}

/// Signs and broadcasts transactions. Confirmation policy belongs to the implementor.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    async fn send_transaction(&self, tx: TransactionRequest) -> ChatbotResult<SubmittedTransaction>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Broadcast, not (yet) observed in a block.
    Pending,
    Confirmed,
    Reverted,
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxStatus::Pending => write!(f, "pending"),
            TxStatus::Confirmed => write!(f, "confirmed"),
            TxStatus::Reverted => write!(f, "reverted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub hash: B256,
    pub status: TxStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    pub operation: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolInvocationRequest {
    pub fn new<T: Into<String>>(operation: T, arguments: Map<String, Value>) -> Self {
        Self {
            operation: operation.into(),
            arguments,
        }
    }

    /// Build a request from the raw argument value an agent runtime hands over.
    /// `null` and the empty string both mean "no arguments".
    pub fn from_value<T: Into<String>>(operation: T, arguments: Value) -> ChatbotResult<Self> {
        let arguments = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            Value::String(s) if s.trim().is_empty() => Map::new(),
            Value::String(s) => match serde_json::from_str::<Value>(&s) {
                Ok(Value::Object(map)) => map,
                _ => {
                    return Err(ChatbotError::invalid_argument(format!(
                        "arguments must be a JSON object, got {:?}",
                        s
                    )));
                }
            },
            other => {
                return Err(ChatbotError::invalid_argument(format!(
                    "arguments must be a JSON object, got {}",
                    other
                )));
            }
        };
        Ok(Self::new(operation, arguments))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResult {
    ReadResult(U256),
    TransactionReceipt { hash: B256, status: TxStatus },
}

impl CallResult {
    pub fn to_json(&self) -> Value {
        match self {
            CallResult::ReadResult(value) => serde_json::json!({
                "value": value.to_string(),
            }),
            CallResult::TransactionReceipt { hash, status } => serde_json::json!({
                "transaction_hash": format!("{hash}"),
                "status": status,
            }),
        }
    }
}

pub struct Dispatcher {
    contract: Address,
    reader: Arc<dyn ContractReader>,
    sender: Arc<dyn TransactionSender>,
}

impl Dispatcher {
    pub fn new(
        contract: Address,
        reader: Arc<dyn ContractReader>,
        sender: Arc<dyn TransactionSender>,
    ) -> Self {
        Self {
            contract,
            reader,
            sender,
        }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub async fn dispatch(&self, request: &ToolInvocationRequest) -> ChatbotResult<CallResult> {
        let operation = Operation::from_name(&request.operation)?;
        let call = ContractCall::from_arguments(operation, &request.arguments)?;
        self.execute(&call).await
    }

    /// Run an already validated call.
    pub async fn execute(&self, call: &ContractCall) -> ChatbotResult<CallResult> {
        let operation = call.operation();
        let encoded = call.encode();

        if operation.mutability().is_read() {
            debug!("📖 eth_call {} on {}", operation, self.contract);
            let output = self
                .reader
                .call(self.contract, encoded.data)
                .await
                .map_err(|e| {
                    warn!("Read of {} failed: {}", operation, e);
                    ChatbotError::read_failed(format!("{}: {}", operation, e))
                })?;
            let value = call.decode_output(&output)?;
            return Ok(CallResult::ReadResult(value));
        }

        info!(
            "✍️  Submitting {} to {} (value: {} wei)",
            operation, self.contract, encoded.value
        );
        let submitted = self
            .sender
            .send_transaction(TransactionRequest {
                to: self.contract,
                data: encoded.data,
                value: encoded.value,
            })
            .await
            .map_err(|e| {
                warn!("Submission of {} failed: {}", operation, e);
                ChatbotError::submission_failed(format!("{}: {}", operation, e))
            })?;

        info!("📨 {} submitted: {} ({})", operation, submitted.hash, submitted.status);
        Ok(CallResult::TransactionReceipt {
            hash: submitted.hash,
            status: submitted.status,
        })
    }
}
