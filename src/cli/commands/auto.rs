use chainbot::agent::AUTONOMOUS_PROMPT;
use chainbot::config::ChatbotConfig;
use chainbot::error::ChatbotResult;
use std::time::Duration;
use tracing::{error, info};

use super::build_agent;

pub async fn handle_auto(config: &ChatbotConfig, interval: Option<u64>) -> ChatbotResult<()> {
    let interval = Duration::from_secs(interval.unwrap_or(config.agent.auto_interval_secs).max(1));
    let mut agent = build_agent(config).await?;
    info!("🤖 Autonomous mode, one action every {:?}", interval);
    println!("Starting autonomous mode... Press Ctrl-C to stop.");

    loop {
        match agent.respond(AUTONOMOUS_PROMPT).await {
            Ok(reply) => {
                for execution in &reply.tool_executions {
                    println!("🔧 {}: {}", execution.name, execution.output.to_message());
                }
                println!("🤖 {}", reply.content);
            }
            Err(e) => error!("Autonomous turn failed: {}", e),
        }
        println!("-------------------");

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!("Goodbye Agent!");
    Ok(())
}
