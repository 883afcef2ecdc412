use chainbot::config::ChatbotConfig;
use chainbot::error::ChatbotResult;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use super::build_agent;

pub async fn handle_chat(config: &ChatbotConfig) -> ChatbotResult<()> {
    let mut agent = build_agent(config).await?;
    info!("💬 Chat mode on {} ({} tools)", config.network.name, agent.tools().len());
    println!("Starting chat mode... Type 'exit' to end.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nPrompt: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            break;
        }

        match agent.respond(input).await {
            Ok(reply) => {
                for execution in &reply.tool_executions {
                    println!("🔧 {}: {}", execution.name, execution.output.to_message());
                }
                println!("🤖 {}", reply.content);
            }
            // one failed turn never ends the session
            Err(e) => {
                error!("Agent turn failed: {}", e);
                println!("⚠️  {}", e);
            }
        }
        println!("-------------------");
    }

    println!("Goodbye Agent!");
    Ok(())
}
