use thiserror::Error;

pub type ChatbotResult<T> = Result<T, ChatbotError>;

#[derive(Error, Debug)]
pub enum ChatbotError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Contract read failed: {0}")]
    ReadFailed(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ChatbotError {
    pub fn unknown_operation<T: Into<String>>(name: T) -> Self {
        ChatbotError::UnknownOperation(name.into())
    }

    pub fn invalid_argument<T: Into<String>>(msg: T) -> Self {
        ChatbotError::InvalidArgument(msg.into())
    }

    pub fn submission_failed<T: Into<String>>(msg: T) -> Self {
        ChatbotError::SubmissionFailed(msg.into())
    }

    pub fn read_failed<T: Into<String>>(msg: T) -> Self {
        ChatbotError::ReadFailed(msg.into())
    }

    pub fn rpc<T: Into<String>>(msg: T) -> Self {
        ChatbotError::Rpc(msg.into())
    }

    pub fn wallet<T: Into<String>>(msg: T) -> Self {
        ChatbotError::Wallet(msg.into())
    }

    pub fn provider<T: Into<String>>(msg: T) -> Self {
        ChatbotError::Provider(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ChatbotError::Config(msg.into())
    }

    /// Short machine-friendly tag, used when an error is handed back to the agent.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatbotError::UnknownOperation(_) => "unknown_operation",
            ChatbotError::InvalidArgument(_) => "invalid_argument",
            ChatbotError::SubmissionFailed(_) => "submission_failed",
            ChatbotError::ReadFailed(_) => "read_failed",
            ChatbotError::Rpc(_) | ChatbotError::Network(_) => "network",
            ChatbotError::Wallet(_) => "wallet",
            ChatbotError::Provider(_) => "provider",
            ChatbotError::Config(_) | ChatbotError::Toml(_) => "config",
            ChatbotError::Io(_) => "io",
            ChatbotError::Json(_) => "json",
        }
    }
}
