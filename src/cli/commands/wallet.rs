use alloy_primitives::utils::format_ether;
use chainbot::chain::{self, WalletInfo};
use chainbot::config::ChatbotConfig;
use chainbot::error::ChatbotResult;

pub async fn handle_wallet(config: &ChatbotConfig) -> ChatbotResult<()> {
    let chain = chain::connect(config).await?;
    let balance = chain.wallet.balance().await?;

    println!("👛 Wallet");
    println!("  • Address:  {}", chain.wallet.address());
    println!("  • Network:  {} (chain id {})", config.network.name, chain.wallet.chain_id());
    println!("  • Balance:  {} ETH", format_ether(balance));
    println!("  • Contract: {}", config.contract.address);
    Ok(())
}
