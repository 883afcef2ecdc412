use std::sync::Arc;

use chainbot::agent::{Agent, system_prompt};
use chainbot::chain::{self, ChainContext};
use chainbot::config::ChatbotConfig;
use chainbot::dispatch::Dispatcher;
use chainbot::error::ChatbotResult;
use chainbot::providers::OpenAIClient;
use chainbot::tools::ToolRegistry;

pub mod auto;
pub mod call;
pub mod chat;
pub mod config;
pub mod tools;
pub mod wallet;

/// Connect to the node, wire the dispatcher to the RPC reader and the local wallet,
/// and expose the wallet itself as a read-only tool.
pub async fn build_registry(config: &ChatbotConfig) -> ChatbotResult<(ChainContext, ToolRegistry)> {
    let chain = chain::connect(config).await?;
    let dispatcher = Arc::new(Dispatcher::new(
        config.contract.address,
        chain.rpc.clone(),
        chain.wallet.clone(),
    ));
    let registry = ToolRegistry::new(dispatcher)
        .with_wallet(chain.wallet.clone(), config.network.name.clone());
    Ok((chain, registry))
}

pub async fn build_agent(config: &ChatbotConfig) -> ChatbotResult<Agent> {
    let provider = Arc::new(OpenAIClient::from_config(&config.llm)?);
    let (_chain, registry) = build_registry(config).await?;

    Ok(Agent::new(
        provider,
        registry,
        system_prompt(config.contract.address, &config.network.name),
    )
    .with_model(config.llm.model.clone())
    .with_temperature(config.llm.temperature)
    .with_max_tool_rounds(config.llm.max_tool_rounds))
}
