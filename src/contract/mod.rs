//! The fixed contract surface: which functions exist, what they take, and how
//! a validated tool call becomes calldata.

pub mod abi;
pub mod encoder;

pub use abi::{AgentContract, Mutability, Operation, ParamKind, Parameter};
pub use encoder::{ContractCall, EncodedCall, parse_address};

/// Contract deployed for the demo on Base Sepolia.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xa633656593bB24252A55A468146fe9536eA899cB";
