#![allow(dead_code)]

use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chainbot::chain::WalletInfo;
use chainbot::dispatch::{
    ContractReader, Dispatcher, SubmittedTransaction, TransactionRequest, TransactionSender,
    TxStatus,
};
use chainbot::error::{ChatbotError, ChatbotResult};

pub const CONTRACT: &str = "0xa633656593bB24252A55A468146fe9536eA899cB";
pub const TOKEN: &str = "0x036CbD53842c5426634e7929541eC2318f3dCF7e";

pub fn contract_address() -> Address {
    CONTRACT.parse().unwrap()
}

pub fn abc_hash() -> B256 {
    format!("0xabc{}", "0".repeat(61)).parse().unwrap()
}

pub fn encode_uint(value: u64) -> Bytes {
    Bytes::from(U256::from(value).to_be_bytes::<32>().to_vec())
}

/// Answers `eth_call` from a queue of uint256 values; fails once the queue is empty.
#[derive(Default)]
pub struct MockReader {
    values: Mutex<VecDeque<u64>>,
    calls: AtomicUsize,
    last_call: Mutex<Option<(Address, Bytes)>>,
    fail: bool,
}

impl MockReader {
    pub fn returning(values: &[u64]) -> Arc<Self> {
        Arc::new(Self {
            values: Mutex::new(values.iter().copied().collect()),
            ..Default::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<(Address, Bytes)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContractReader for MockReader {
    async fn call(&self, to: Address, data: Bytes) -> ChatbotResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((to, data));
        if self.fail {
            return Err(ChatbotError::rpc("node unreachable"));
        }
        match self.values.lock().unwrap().pop_front() {
            Some(value) => Ok(encode_uint(value)),
            None => Err(ChatbotError::rpc("no more scripted values")),
        }
    }
}

/// Accepts every transaction and hands back the same hash.
pub struct MockSender {
    hash: B256,
    status: TxStatus,
    fail: bool,
    requests: Mutex<Vec<TransactionRequest>>,
}

impl MockSender {
    pub fn returning(hash: B256) -> Arc<Self> {
        Arc::new(Self {
            hash,
            status: TxStatus::Pending,
            fail: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            hash: B256::ZERO,
            status: TxStatus::Pending,
            fail: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<TransactionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSender for MockSender {
    async fn send_transaction(&self, tx: TransactionRequest) -> ChatbotResult<SubmittedTransaction> {
        self.requests.lock().unwrap().push(tx);
        if self.fail {
            return Err(ChatbotError::rpc("nonce too low"));
        }
        Ok(SubmittedTransaction {
            hash: self.hash,
            status: self.status,
        })
    }
}

/// Fixed account with a scripted balance.
pub struct MockWallet {
    pub address: Address,
    pub balance: Option<U256>,
}

impl MockWallet {
    pub fn holding(balance: U256) -> Arc<Self> {
        Arc::new(Self {
            address: Address::repeat_byte(0x42),
            balance: Some(balance),
        })
    }

    pub fn offline() -> Arc<Self> {
        Arc::new(Self {
            address: Address::repeat_byte(0x42),
            balance: None,
        })
    }
}

#[async_trait]
impl WalletInfo for MockWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        84532
    }

    async fn balance(&self) -> ChatbotResult<U256> {
        self.balance.ok_or_else(|| ChatbotError::rpc("node unreachable"))
    }
}

pub fn dispatcher(reader: Arc<MockReader>, sender: Arc<MockSender>) -> Dispatcher {
    Dispatcher::new(contract_address(), reader, sender)
}
