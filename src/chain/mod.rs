//! Node access and transaction signing for the single supported network.

pub mod rpc;
pub mod tx;
pub mod wallet;

pub use rpc::RpcClient;
pub use tx::Eip1559Transaction;
pub use wallet::{
    ConfirmationPolicy, LocalWallet, WalletInfo, address_of, load_or_create_key, parse_private_key,
};

use std::sync::Arc;
use tracing::info;

use crate::config::ChatbotConfig;
use crate::error::{ChatbotError, ChatbotResult};

pub struct ChainContext {
    pub rpc: Arc<RpcClient>,
    pub wallet: Arc<LocalWallet>,
}

/// Open the RPC connection, check it serves the configured chain, and unlock the wallet.
pub async fn connect(config: &ChatbotConfig) -> ChatbotResult<ChainContext> {
    let rpc = Arc::new(RpcClient::new(config.network.rpc_url.clone())?);

    let remote_chain_id = rpc.chain_id().await?;
    if remote_chain_id != config.network.chain_id {
        return Err(ChatbotError::config(format!(
            "RPC endpoint {} serves chain {}, expected {} ({})",
            rpc.url(),
            remote_chain_id,
            config.network.chain_id,
            config.network.name
        )));
    }

    let key = match &config.wallet.private_key {
        Some(raw) => parse_private_key(raw)?,
        None => load_or_create_key(&config.wallet_key_path()?).await?,
    };

    let wallet = LocalWallet::new(
        key,
        config.network.chain_id,
        rpc.clone(),
        config.wallet.confirmation.clone(),
    );
    info!("👛 Wallet {} on {}", wallet.address(), config.network.name);

    Ok(ChainContext {
        rpc,
        wallet: Arc::new(wallet),
    })
}
