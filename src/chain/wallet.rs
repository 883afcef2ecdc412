use alloy_primitives::{Address, B256, U256, keccak256};
use async_trait::async_trait;
use k256::ecdsa::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::rpc::RpcClient;
use super::tx::Eip1559Transaction;
use crate::dispatch::{SubmittedTransaction, TransactionRequest, TransactionSender, TxStatus};
use crate::error::{ChatbotError, ChatbotResult};

const FALLBACK_GAS_LIMIT: u64 = 300_000;
const FALLBACK_PRIORITY_FEE_WEI: u64 = 1_000_000_000;
const GAS_LIMIT_MARGIN_PERCENT: u64 = 20;

/// What the wallet does after broadcasting a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConfirmationPolicy {
    /// Report the hash as pending right after broadcast.
    None,
    /// Poll for the receipt; report pending if it does not show up in time.
    Receipt {
        timeout_secs: u64,
        poll_interval_ms: u64,
    },
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        ConfirmationPolicy::Receipt {
            timeout_secs: 60,
            poll_interval_ms: 2_000,
        }
    }
}

/// Read-only view of the agent's own account.
#[async_trait]
pub trait WalletInfo: Send + Sync {
    fn address(&self) -> Address;
    fn chain_id(&self) -> u64;
    async fn balance(&self) -> ChatbotResult<U256>;
}

/// Signs EIP-1559 transactions with a locally held secp256k1 key.
pub struct LocalWallet {
    key: SigningKey,
    address: Address,
    chain_id: u64,
    rpc: Arc<RpcClient>,
    confirmation: ConfirmationPolicy,
}

impl LocalWallet {
    pub fn new(
        key: SigningKey,
        chain_id: u64,
        rpc: Arc<RpcClient>,
        confirmation: ConfirmationPolicy,
    ) -> Self {
        let address = address_of(&key);
        Self {
            key,
            address,
            chain_id,
            rpc,
            confirmation,
        }
    }

    /// Fill nonce, gas and fees for `request` from the node.
    pub async fn build_transaction(&self, request: &TransactionRequest) -> ChatbotResult<Eip1559Transaction> {
        let nonce = self.rpc.pending_nonce(self.address).await?;

        let gas_limit = match self.rpc.estimate_gas(self.address, request).await {
            Ok(estimate) => with_gas_margin(estimate),
            Err(e) => {
                warn!("Gas estimation failed, using {}: {}", FALLBACK_GAS_LIMIT, e);
                FALLBACK_GAS_LIMIT
            }
        };

        let gas_price = self.rpc.gas_price().await?;
        let priority_fee = self
            .rpc
            .max_priority_fee()
            .await
            .unwrap_or_else(|_| U256::from(FALLBACK_PRIORITY_FEE_WEI));

        Ok(Eip1559Transaction {
            chain_id: self.chain_id,
            nonce,
            max_priority_fee_per_gas: priority_fee,
            max_fee_per_gas: gas_price + priority_fee,
            gas_limit,
            to: request.to,
            value: request.value,
            input: request.data.clone(),
        })
    }

    /// Signed type-2 envelope, ready for `eth_sendRawTransaction`.
    pub fn sign(&self, tx: &Eip1559Transaction) -> ChatbotResult<Vec<u8>> {
        let hash = tx.signing_hash();
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(hash.as_slice())
            .map_err(|e| ChatbotError::wallet(format!("signing failed: {}", e)))?;
        let bytes = signature.to_bytes();
        let r = U256::from_be_slice(&bytes[..32]);
        let s = U256::from_be_slice(&bytes[32..]);
        Ok(tx.encode_signed(recovery_id.is_y_odd(), r, s))
    }

    async fn wait_for_receipt(&self, hash: B256, timeout: Duration, poll: Duration) -> TxStatus {
        let polling = async {
            loop {
                match self.rpc.transaction_status(hash).await {
                    Ok(Some(status)) => return status,
                    Ok(None) => debug!("⏳ {} not mined yet", hash),
                    Err(e) => warn!("Receipt lookup for {} failed: {}", hash, e),
                }
                tokio::time::sleep(poll).await;
            }
        };

        match tokio::time::timeout(timeout, polling).await {
            Ok(status) => status,
            Err(_) => {
                warn!("No receipt for {} after {:?}", hash, timeout);
                TxStatus::Pending
            }
        }
    }
}

#[async_trait]
impl WalletInfo for LocalWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn balance(&self) -> ChatbotResult<U256> {
        self.rpc.balance(self.address).await
    }
}

#[async_trait]
impl TransactionSender for LocalWallet {
    async fn send_transaction(&self, request: TransactionRequest) -> ChatbotResult<SubmittedTransaction> {
        let tx = self.build_transaction(&request).await?;
        let raw = self.sign(&tx)?;
        let hash = self.rpc.send_raw_transaction(&raw).await?;
        info!("🚀 Broadcast {} (nonce {})", hash, tx.nonce);

        let status = match &self.confirmation {
            ConfirmationPolicy::None => TxStatus::Pending,
            ConfirmationPolicy::Receipt {
                timeout_secs,
                poll_interval_ms,
            } => {
                self.wait_for_receipt(
                    hash,
                    Duration::from_secs(*timeout_secs),
                    Duration::from_millis(*poll_interval_ms),
                )
                .await
            }
        };

        Ok(SubmittedTransaction { hash, status })
    }
}

fn with_gas_margin(estimate: u64) -> u64 {
    estimate.saturating_add(estimate.saturating_mul(GAS_LIMIT_MARGIN_PERCENT) / 100)
}

pub fn address_of(key: &SigningKey) -> Address {
    address_of_verifying_key(key.verifying_key())
}

fn address_of_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&digest[12..])
}

pub fn parse_private_key(raw: &str) -> ChatbotResult<SigningKey> {
    let trimmed = raw.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(hex_part)
        .map_err(|_| ChatbotError::wallet("private key must be 32 bytes of hex"))?;
    if bytes.len() != 32 {
        return Err(ChatbotError::wallet("private key must be 32 bytes of hex"));
    }
    SigningKey::from_slice(&bytes).map_err(|_| ChatbotError::wallet("private key is not a valid secp256k1 scalar"))
}

/// Load the key stored at `path`, or create and persist a new one.
pub async fn load_or_create_key(path: &Path) -> ChatbotResult<SigningKey> {
    if fs::try_exists(path).await? {
        let contents = fs::read_to_string(path).await?;
        debug!("Loaded wallet key from {}", path.display());
        return parse_private_key(&contents);
    }

    let key = SigningKey::random(&mut rand::rngs::OsRng);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    // owner-only from the moment the file exists
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(path).await?;
    file.write_all(format!("0x{}\n", hex::encode(key.to_bytes())).as_bytes())
        .await?;
    file.sync_all().await?;

    info!("🔑 Created new wallet {} at {}", address_of(&key), path.display());
    Ok(key)
}
