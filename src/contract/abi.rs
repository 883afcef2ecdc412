use serde::{Deserialize, Serialize};

use crate::error::{ChatbotError, ChatbotResult};

alloy_sol_types::sol! {
    /// Deposit/counter contract deployed on Base Sepolia.
    interface AgentContract {
        function deposit() external payable;
        function depositERC20(address tokenAddress, uint256 amount) external;
        function incrementCounter() external;
        function getBalance() external view returns (uint256);
        function getCounter() external view returns (uint256);
        function getERC20Balance(address token) external view returns (uint256);
        function withdraw(address to, uint256 amount) external;
        function withdrawERC20(address token, address to, uint256 amount) external;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    Read,
    Write,
    PayableWrite,
}

impl Mutability {
    pub fn is_read(self) -> bool {
        self == Mutability::Read
    }
}

/// Semantic type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Address,
    Uint256,
    /// Decimal ETH amount, converted to wei before it reaches the chain.
    Ether,
}

impl ParamKind {
    pub fn json_schema(self) -> serde_json::Value {
        match self {
            ParamKind::Address => serde_json::json!({
                "type": "string",
                "pattern": "^0x[0-9a-fA-F]{40}$",
            }),
            ParamKind::Uint256 => serde_json::json!({
                "type": ["string", "integer"],
                "pattern": "^[0-9]+$",
                "minimum": 0,
            }),
            ParamKind::Ether => serde_json::json!({
                "type": ["string", "number"],
                "pattern": "^[0-9]+(\\.[0-9]{1,18})?$",
                "minimum": 0,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
}

const fn param(name: &'static str, kind: ParamKind, description: &'static str) -> Parameter {
    Parameter { name, kind, description }
}

const DEPOSIT_PARAMS: &[Parameter] = &[param(
    "amount",
    ParamKind::Ether,
    "Amount of ETH to deposit, as a decimal string such as \"0.0001\"",
)];

const DEPOSIT_ERC20_PARAMS: &[Parameter] = &[
    param("token", ParamKind::Address, "ERC20 token contract address"),
    param(
        "amount",
        ParamKind::Uint256,
        "Raw integer token amount in the token's smallest unit",
    ),
];

const GET_ERC20_BALANCE_PARAMS: &[Parameter] =
    &[param("token", ParamKind::Address, "ERC20 token contract address")];

const WITHDRAW_PARAMS: &[Parameter] = &[
    param("to", ParamKind::Address, "Recipient address"),
    param(
        "amount",
        ParamKind::Ether,
        "Amount of ETH to withdraw, as a decimal string such as \"0.01\"",
    ),
];

const WITHDRAW_ERC20_PARAMS: &[Parameter] = &[
    param("token", ParamKind::Address, "ERC20 token contract address"),
    param("to", ParamKind::Address, "Recipient address"),
    param(
        "amount",
        ParamKind::Uint256,
        "Raw integer token amount in the token's smallest unit",
    ),
];

/// Every contract function the agent is allowed to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Deposit,
    DepositErc20,
    IncrementCounter,
    GetBalance,
    GetCounter,
    GetErc20Balance,
    Withdraw,
    WithdrawErc20,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Deposit,
        Operation::DepositErc20,
        Operation::IncrementCounter,
        Operation::GetBalance,
        Operation::GetCounter,
        Operation::GetErc20Balance,
        Operation::Withdraw,
        Operation::WithdrawErc20,
    ];

    pub fn from_name(name: &str) -> ChatbotResult<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| ChatbotError::unknown_operation(name))
    }

    /// ABI function name, also used as the tool name.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Deposit => "deposit",
            Operation::DepositErc20 => "depositERC20",
            Operation::IncrementCounter => "incrementCounter",
            Operation::GetBalance => "getBalance",
            Operation::GetCounter => "getCounter",
            Operation::GetErc20Balance => "getERC20Balance",
            Operation::Withdraw => "withdraw",
            Operation::WithdrawErc20 => "withdrawERC20",
        }
    }

    pub fn mutability(self) -> Mutability {
        match self {
            Operation::Deposit => Mutability::PayableWrite,
            Operation::GetBalance | Operation::GetCounter | Operation::GetErc20Balance => {
                Mutability::Read
            }
            Operation::DepositErc20
            | Operation::IncrementCounter
            | Operation::Withdraw
            | Operation::WithdrawErc20 => Mutability::Write,
        }
    }

    pub fn parameters(self) -> &'static [Parameter] {
        match self {
            Operation::Deposit => DEPOSIT_PARAMS,
            Operation::DepositErc20 => DEPOSIT_ERC20_PARAMS,
            Operation::GetErc20Balance => GET_ERC20_BALANCE_PARAMS,
            Operation::Withdraw => WITHDRAW_PARAMS,
            Operation::WithdrawErc20 => WITHDRAW_ERC20_PARAMS,
            Operation::IncrementCounter | Operation::GetBalance | Operation::GetCounter => &[],
        }
    }

    /// Reads return a single uint256; writes return nothing.
    pub fn returns(self) -> Option<ParamKind> {
        if self.mutability().is_read() {
            Some(ParamKind::Uint256)
        } else {
            None
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::Deposit => {
                "Deposit ETH into the custom smart contract. Argument `amount` is an ETH amount like '0.0001'."
            }
            Operation::DepositErc20 => {
                "Deposit ERC20 tokens into the custom contract. Provide the token address and a raw integer amount."
            }
            Operation::IncrementCounter => {
                "Increment the counter in the custom smart contract (no arguments)."
            }
            Operation::GetBalance => {
                "Get the ETH balance (in Wei) of the custom smart contract (no arguments)."
            }
            Operation::GetCounter => {
                "Get the current counter value of the custom smart contract (no arguments)."
            }
            Operation::GetErc20Balance => {
                "Get the ERC20 token balance of the custom contract. Provide the token address."
            }
            Operation::Withdraw => {
                "Withdraw native ETH from the custom contract. Provide the recipient address and an ETH amount like '0.01'."
            }
            Operation::WithdrawErc20 => {
                "Withdraw ERC20 tokens from the custom contract. Provide the token address, the recipient address and a raw integer amount."
            }
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Operation {
    type Err = ChatbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::from_name(s)
    }
}
