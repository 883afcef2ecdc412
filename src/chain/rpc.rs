use alloy_primitives::{Address, B256, Bytes, U64, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, error};

use crate::dispatch::{ContractReader, TransactionRequest, TxStatus};
use crate::error::{ChatbotError, ChatbotResult};

const RPC_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcReceipt {
    #[serde(default)]
    status: Option<U64>,
}

/// Minimal Ethereum JSON-RPC client over HTTP.
pub struct RpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new<T: Into<String>>(url: T) -> ChatbotResult<Self> {
        let client = Client::builder().timeout(RPC_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> ChatbotResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!("RPC {} -> {}", method, self.url);

        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("RPC {} returned HTTP {}: {}", method, status, body);
            return Err(ChatbotError::rpc(format!("{} returned HTTP {}: {}", method, status, body)));
        }

        let body: RpcResponse = response.json().await?;
        if let Some(err) = body.error {
            return Err(ChatbotError::rpc(format!(
                "{} failed ({}): {}",
                method, err.code, err.message
            )));
        }

        let result = body.result.unwrap_or(Value::Null);
        serde_json::from_value(result)
            .map_err(|e| ChatbotError::rpc(format!("{} returned an unexpected result: {}", method, e)))
    }

    pub async fn chain_id(&self) -> ChatbotResult<u64> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(id.to::<u64>())
    }

    pub async fn eth_call(&self, to: Address, data: &Bytes) -> ChatbotResult<Bytes> {
        self.request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    pub async fn balance(&self, address: Address) -> ChatbotResult<U256> {
        self.request("eth_getBalance", json!([address, "latest"])).await
    }

    pub async fn pending_nonce(&self, address: Address) -> ChatbotResult<u64> {
        let nonce: U64 = self
            .request("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        Ok(nonce.to::<u64>())
    }

    pub async fn gas_price(&self) -> ChatbotResult<U256> {
        self.request("eth_gasPrice", json!([])).await
    }

    pub async fn max_priority_fee(&self) -> ChatbotResult<U256> {
        self.request("eth_maxPriorityFeePerGas", json!([])).await
    }

    pub async fn estimate_gas(&self, from: Address, tx: &TransactionRequest) -> ChatbotResult<u64> {
        let gas: U64 = self
            .request(
                "eth_estimateGas",
                json!([{ "from": from, "to": tx.to, "value": tx.value, "data": tx.data }]),
            )
            .await?;
        Ok(gas.to::<u64>())
    }

    pub async fn send_raw_transaction(&self, raw: &[u8]) -> ChatbotResult<B256> {
        self.request(
            "eth_sendRawTransaction",
            json!([format!("0x{}", hex::encode(raw))]),
        )
        .await
    }

    /// `None` while the transaction is not yet mined.
    pub async fn transaction_status(&self, hash: B256) -> ChatbotResult<Option<TxStatus>> {
        let receipt: Option<RpcReceipt> = self
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?;
        Ok(receipt.map(|r| match r.status {
            Some(status) if status == U64::from(1u64) => TxStatus::Confirmed,
            Some(_) => TxStatus::Reverted,
            // pre-Byzantium receipts carry no status; treat as mined
            None => TxStatus::Confirmed,
        }))
    }
}

#[async_trait]
impl ContractReader for RpcClient {
    async fn call(&self, to: Address, data: Bytes) -> ChatbotResult<Bytes> {
        self.eth_call(to, &data).await
    }
}
