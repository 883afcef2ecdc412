//! # chainbot
//!
//! A conversational agent wired to a single deposit/counter contract on Base
//! Sepolia. The model picks a tool, the [`dispatch::Dispatcher`] validates and
//! encodes the call, and either reads chain state or has the local wallet sign
//! and broadcast a transaction.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chainbot::{ChatbotConfig, Dispatcher, ToolRegistry, chain};
//!
//! #[tokio::main]
//! async fn main() -> chainbot::ChatbotResult<()> {
//!     let config = ChatbotConfig::default();
//!     let chain = chain::connect(&config).await?;
//!     let dispatcher = Arc::new(Dispatcher::new(
//!         config.contract.address,
//!         chain.rpc.clone(),
//!         chain.wallet.clone(),
//!     ));
//!     let tools = ToolRegistry::new(dispatcher);
//!     let counter = tools.execute_tool("getCounter", serde_json::json!({})).await?;
//!     println!("{}", counter.content);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod chain;
pub mod config;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod providers;
pub mod tools;

pub use agent::{Agent, AgentReply};
pub use config::{ChatbotConfig, ConfigManager};
pub use contract::{ContractCall, EncodedCall, Mutability, Operation};
pub use dispatch::{
    CallResult, ContractReader, Dispatcher, ToolInvocationRequest, TransactionRequest,
    TransactionSender, TxStatus,
};
pub use error::{ChatbotError, ChatbotResult};
pub use tools::{Tool, ToolOutput, ToolRegistry};

/// The current version of chainbot
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
