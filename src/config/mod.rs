// Configuration: defaults, then config.toml, then environment
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::chain::ConfirmationPolicy;
use crate::contract::{DEFAULT_CONTRACT_ADDRESS, parse_address};
use crate::error::{ChatbotError, ChatbotResult};

pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;
pub const BASE_SEPOLIA_NAME: &str = "base-sepolia";
pub const BASE_SEPOLIA_RPC_URL: &str = "https://sepolia.base.org";

const APP_DIR: &str = "chainbot";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChatbotConfig {
    pub network: NetworkConfig,
    pub contract: ContractConfig,
    pub wallet: WalletConfig,
    pub llm: LlmConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: BASE_SEPOLIA_NAME.to_string(),
            chain_id: BASE_SEPOLIA_CHAIN_ID,
            rpc_url: BASE_SEPOLIA_RPC_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub address: Address,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONTRACT_ADDRESS
                .parse()
                .unwrap_or(Address::ZERO),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Hex private key. Never written back to disk by `save_config`.
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
    pub key_file: Option<PathBuf>,
    pub confirmation: ConfirmationPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tool_rounds: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.2,
            max_tool_rounds: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub auto_interval_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            auto_interval_secs: 10,
        }
    }
}

impl ChatbotConfig {
    pub fn from_toml(contents: &str) -> ChatbotResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> ChatbotResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ChatbotError::config(format!("failed to serialize config: {}", e)))
    }

    /// Apply `CHAINBOT_*` / `OPENAI_*` overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> ChatbotResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CHAINBOT_RPC_URL") {
            self.network.rpc_url = url;
        }
        if let Some(raw) = lookup("CHAINBOT_CONTRACT_ADDRESS") {
            self.contract.address = parse_address(&raw)
                .map_err(|e| ChatbotError::config(format!("CHAINBOT_CONTRACT_ADDRESS: {}", e)))?;
        }
        if let Some(key) = lookup("CHAINBOT_PRIVATE_KEY") {
            self.wallet.private_key = Some(key);
        }
        if let Some(model) = lookup("CHAINBOT_MODEL") {
            self.llm.model = model;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        Ok(())
    }

    pub fn validate(&self) -> ChatbotResult<()> {
        if self.network.chain_id != BASE_SEPOLIA_CHAIN_ID {
            return Err(ChatbotError::config(format!(
                "only {} (chain id {}) is supported, got chain id {}",
                BASE_SEPOLIA_NAME, BASE_SEPOLIA_CHAIN_ID, self.network.chain_id
            )));
        }
        if !self.network.rpc_url.starts_with("http://") && !self.network.rpc_url.starts_with("https://") {
            return Err(ChatbotError::config(format!(
                "rpc_url must be an http(s) URL, got '{}'",
                self.network.rpc_url
            )));
        }
        if self.contract.address == Address::ZERO {
            return Err(ChatbotError::config("contract address must not be zero"));
        }
        if self.llm.max_tool_rounds == 0 {
            return Err(ChatbotError::config("llm.max_tool_rounds must be at least 1"));
        }
        if let ConfirmationPolicy::Receipt { poll_interval_ms: 0, .. } = self.wallet.confirmation {
            return Err(ChatbotError::config("wallet.confirmation.poll_interval_ms must be positive"));
        }
        Ok(())
    }

    pub fn wallet_key_path(&self) -> ChatbotResult<PathBuf> {
        if let Some(path) = &self.wallet.key_file {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join("wallet.key"))
            .ok_or_else(|| ChatbotError::config("no data directory available; set wallet.key_file"))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

pub struct ConfigManager {
    path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            path: default_config_path(),
        }
    }

    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn load_config(&self) -> ChatbotResult<ChatbotConfig> {
        let mut config = match &self.path {
            Some(path) if tokio::fs::try_exists(path).await? => {
                debug!("Reading config from {}", path.display());
                let contents = tokio::fs::read_to_string(path).await?;
                ChatbotConfig::from_toml(&contents)?
            }
            _ => ChatbotConfig::default(),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save_config(&self, config: &ChatbotConfig) -> ChatbotResult<PathBuf> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| ChatbotError::config("no config directory available"))?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, config.to_toml()?).await?;
        info!("💾 Wrote config to {}", path.display());
        Ok(path)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
