use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use super::{Tool, ToolOutput};
use crate::contract::Operation;
use crate::dispatch::{CallResult, Dispatcher, ToolInvocationRequest};
use crate::error::ChatbotResult;

/// Exposes one contract operation as an agent tool.
pub struct ContractTool {
    operation: Operation,
    dispatcher: Arc<Dispatcher>,
}

impl ContractTool {
    pub fn new(operation: Operation, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            operation,
            dispatcher,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    fn render(&self, result: &CallResult) -> String {
        let summary = match result {
            CallResult::ReadResult(value) => match self.operation {
                Operation::GetBalance => format!("Contract ETH balance: {} wei", value),
                Operation::GetCounter => format!("Counter value: {}", value),
                _ => format!("Token balance: {}", value),
            },
            CallResult::TransactionReceipt { hash, status } => format!(
                "Successfully called {}. Transaction hash: {} (status: {})",
                self.operation, hash, status
            ),
        };
        json!({ "summary": summary, "result": result.to_json() }).to_string()
    }
}

#[async_trait]
impl Tool for ContractTool {
    async fn execute(&self, args: Value) -> ChatbotResult<ToolOutput> {
        let request = ToolInvocationRequest::from_value(self.operation.name(), args)?;
        let result = self.dispatcher.dispatch(&request).await?;
        Ok(ToolOutput::ok(self.render(&result)))
    }

    fn name(&self) -> &str {
        self.operation.name()
    }

    fn description(&self) -> &str {
        self.operation.description()
    }

    fn parameters(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in self.operation.parameters() {
            let mut schema = param.kind.json_schema();
            schema["description"] = json!(param.description);
            properties.insert(param.name.to_string(), schema);
            required.push(json!(param.name));
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}
