use chainbot::config::ChatbotConfig;
use chainbot::error::{ChatbotError, ChatbotResult};
use serde_json::Value;
use tracing::info;

use super::build_registry;

pub async fn handle_call(config: &ChatbotConfig, tool: String, args: String) -> ChatbotResult<()> {
    let args: Value = serde_json::from_str(&args)
        .map_err(|e| ChatbotError::invalid_argument(format!("--args is not valid JSON: {}", e)))?;

    let (_chain, registry) = build_registry(config).await?;
    info!("📞 Calling {} directly", tool);

    let output = registry.execute_tool(&tool, args).await?;
    println!("{}", output.to_message());
    Ok(())
}
