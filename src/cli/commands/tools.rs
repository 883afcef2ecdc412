use chainbot::contract::{Mutability, Operation};
use chainbot::error::ChatbotResult;
use chainbot::tools::{WALLET_TOOL_DESCRIPTION, WALLET_TOOL_NAME};
use tracing::info;

pub async fn handle_tools() -> ChatbotResult<()> {
    info!("📋 Listing contract tools");
    println!("📋 Contract tools:");

    for operation in Operation::ALL {
        let kind = match operation.mutability() {
            Mutability::Read => "read",
            Mutability::Write => "write",
            Mutability::PayableWrite => "payable",
        };
        println!("  • {} [{}] - {}", operation.name(), kind, operation.description());
        for param in operation.parameters() {
            println!("      {}: {:?} - {}", param.name, param.kind, param.description);
        }
    }

    println!("  • {} [read] - {}", WALLET_TOOL_NAME, WALLET_TOOL_DESCRIPTION);

    Ok(())
}
