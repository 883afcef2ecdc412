use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "chainbot")]
#[command(about = "⛓️  chainbot - talk to a smart contract on Base Sepolia")]
#[command(long_about = "A conversational agent that deposits, withdraws, counts and reads balances on a single contract through LLM tool calling")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat mode
    Chat,

    /// Autonomous mode: the agent picks an action on a fixed interval
    Auto {
        /// Seconds between actions (overrides agent.auto_interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// List the contract tools exposed to the agent
    Tools,

    /// Invoke a contract tool directly, bypassing the LLM
    Call {
        /// Tool name, e.g. getCounter or depositERC20
        tool: String,
        /// JSON object with the tool arguments
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Show the agent wallet address and balance
    Wallet,

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration (secrets omitted)
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
