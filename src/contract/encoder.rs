use alloy_primitives::utils::parse_ether;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::abi::{AgentContract, Operation, ParamKind};
use crate::error::{ChatbotError, ChatbotResult};

/// Fully typed contract call, one variant per supported operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    Deposit { amount_wei: U256 },
    DepositErc20 { token: Address, amount: U256 },
    IncrementCounter,
    GetBalance,
    GetCounter,
    GetErc20Balance { token: Address },
    Withdraw { to: Address, amount_wei: U256 },
    WithdrawErc20 { token: Address, to: Address, amount: U256 },
}

/// Calldata plus the native value attached to the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    pub data: Bytes,
    pub value: U256,
}

impl ContractCall {
    /// Validate `args` against the operation's parameter list and build the typed call.
    pub fn from_arguments(operation: Operation, args: &Map<String, Value>) -> ChatbotResult<Self> {
        let declared = operation.parameters();

        if let Some(unexpected) = args
            .keys()
            .find(|key| !declared.iter().any(|param| param.name == key.as_str()))
        {
            return Err(ChatbotError::invalid_argument(format!(
                "{} does not take an argument named '{}'",
                operation, unexpected
            )));
        }

        let reader = ArgReader { operation, args };

        let call = match operation {
            Operation::Deposit => ContractCall::Deposit {
                amount_wei: reader.ether("amount")?,
            },
            Operation::DepositErc20 => ContractCall::DepositErc20 {
                token: reader.address("token")?,
                amount: reader.uint("amount")?,
            },
            Operation::IncrementCounter => ContractCall::IncrementCounter,
            Operation::GetBalance => ContractCall::GetBalance,
            Operation::GetCounter => ContractCall::GetCounter,
            Operation::GetErc20Balance => ContractCall::GetErc20Balance {
                token: reader.address("token")?,
            },
            Operation::Withdraw => ContractCall::Withdraw {
                to: reader.address("to")?,
                amount_wei: reader.ether("amount")?,
            },
            Operation::WithdrawErc20 => ContractCall::WithdrawErc20 {
                token: reader.address("token")?,
                to: reader.address("to")?,
                amount: reader.uint("amount")?,
            },
        };

        Ok(call)
    }

    pub fn operation(&self) -> Operation {
        match self {
            ContractCall::Deposit { .. } => Operation::Deposit,
            ContractCall::DepositErc20 { .. } => Operation::DepositErc20,
            ContractCall::IncrementCounter => Operation::IncrementCounter,
            ContractCall::GetBalance => Operation::GetBalance,
            ContractCall::GetCounter => Operation::GetCounter,
            ContractCall::GetErc20Balance { .. } => Operation::GetErc20Balance,
            ContractCall::Withdraw { .. } => Operation::Withdraw,
            ContractCall::WithdrawErc20 { .. } => Operation::WithdrawErc20,
        }
    }

    pub fn encode(&self) -> EncodedCall {
        let (data, value) = match self {
            ContractCall::Deposit { amount_wei } => {
                (AgentContract::depositCall {}.abi_encode(), *amount_wei)
            }
            ContractCall::DepositErc20 { token, amount } => (
                AgentContract::depositERC20Call {
                    tokenAddress: *token,
                    amount: *amount,
                }
                .abi_encode(),
                U256::ZERO,
            ),
            ContractCall::IncrementCounter => {
                (AgentContract::incrementCounterCall {}.abi_encode(), U256::ZERO)
            }
            ContractCall::GetBalance => (AgentContract::getBalanceCall {}.abi_encode(), U256::ZERO),
            ContractCall::GetCounter => (AgentContract::getCounterCall {}.abi_encode(), U256::ZERO),
            ContractCall::GetErc20Balance { token } => (
                AgentContract::getERC20BalanceCall { token: *token }.abi_encode(),
                U256::ZERO,
            ),
            ContractCall::Withdraw { to, amount_wei } => (
                AgentContract::withdrawCall {
                    to: *to,
                    amount: *amount_wei,
                }
                .abi_encode(),
                U256::ZERO,
            ),
            ContractCall::WithdrawErc20 { token, to, amount } => (
                AgentContract::withdrawERC20Call {
                    token: *token,
                    to: *to,
                    amount: *amount,
                }
                .abi_encode(),
                U256::ZERO,
            ),
        };

        EncodedCall {
            data: Bytes::from(data),
            value,
        }
    }

    /// Decode the return data of a read call.
    pub fn decode_output(&self, data: &[u8]) -> ChatbotResult<U256> {
        let decoded = match self {
            ContractCall::GetBalance => {
                AgentContract::getBalanceCall::abi_decode_returns(data, true).map(|r| r._0)
            }
            ContractCall::GetCounter => {
                AgentContract::getCounterCall::abi_decode_returns(data, true).map(|r| r._0)
            }
            ContractCall::GetErc20Balance { .. } => {
                AgentContract::getERC20BalanceCall::abi_decode_returns(data, true).map(|r| r._0)
            }
            other => {
                return Err(ChatbotError::invalid_argument(format!(
                    "{} does not return a value",
                    other.operation()
                )));
            }
        };

        decoded.map_err(|e| {
            ChatbotError::read_failed(format!(
                "could not decode {} output: {}",
                self.operation(),
                e
            ))
        })
    }
}

struct ArgReader<'a> {
    operation: Operation,
    args: &'a Map<String, Value>,
}

impl ArgReader<'_> {
    fn value(&self, name: &str, kind: ParamKind) -> ChatbotResult<&Value> {
        debug_assert!(
            self.operation
                .parameters()
                .iter()
                .any(|p| p.name == name && p.kind == kind)
        );
        self.args.get(name).ok_or_else(|| {
            ChatbotError::invalid_argument(format!(
                "{} requires argument '{}'",
                self.operation, name
            ))
        })
    }

    fn address(&self, name: &str) -> ChatbotResult<Address> {
        let value = self.value(name, ParamKind::Address)?;
        let raw = value.as_str().ok_or_else(|| {
            ChatbotError::invalid_argument(format!("'{}' must be an address string", name))
        })?;
        parse_address(raw)
            .map_err(|reason| ChatbotError::invalid_argument(format!("'{}': {}", name, reason)))
    }

    fn uint(&self, name: &str) -> ChatbotResult<U256> {
        let value = self.value(name, ParamKind::Uint256)?;
        let raw = match value {
            Value::Number(n) if n.is_u64() => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            _ => {
                return Err(ChatbotError::invalid_argument(format!(
                    "'{}' must be a non-negative integer, got {}",
                    name, value
                )));
            }
        };
        parse_uint(&raw)
            .map_err(|reason| ChatbotError::invalid_argument(format!("'{}': {}", name, reason)))
    }

    fn ether(&self, name: &str) -> ChatbotResult<U256> {
        let value = self.value(name, ParamKind::Ether)?;
        let raw = match value {
            // serde_json prints small and large floats as `1e-7`
            Value::Number(n) => expand_exponent(&n.to_string())
                .map_err(|reason| ChatbotError::invalid_argument(format!("'{}': {}", name, reason)))?,
            Value::String(s) => s.trim().to_string(),
            _ => {
                return Err(ChatbotError::invalid_argument(format!(
                    "'{}' must be an ETH amount, got {}",
                    name, value
                )));
            }
        };
        parse_ether_amount(&raw)
            .map_err(|reason| ChatbotError::invalid_argument(format!("'{}': {}", name, reason)))
    }
}

pub fn parse_address(raw: &str) -> Result<Address, String> {
    let trimmed = raw.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| format!("address '{}' must be 0x-prefixed", trimmed))?;
    if hex_part.len() != 40 || !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!(
            "address '{}' must be a 0x-prefixed 20-byte hex string",
            trimmed
        ));
    }
    Address::from_str(trimmed).map_err(|e| format!("invalid address '{}': {}", trimmed, e))
}

fn parse_uint(raw: &str) -> Result<U256, String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a non-negative decimal integer", raw));
    }
    U256::from_str_radix(raw, 10).map_err(|e| format!("'{}' does not fit in uint256: {}", raw, e))
}

const ETHER_DECIMALS: usize = 18;
const MAX_EXPONENT: i64 = 96;

/// Rewrite `1.5e-7` style numbers as plain decimals; other input passes through.
fn expand_exponent(raw: &str) -> Result<String, String> {
    let Some((mantissa, exponent)) = raw.split_once(|c| c == 'e' || c == 'E') else {
        return Ok(raw.to_string());
    };
    let exponent: i64 = exponent
        .strip_prefix('+')
        .unwrap_or(exponent)
        .parse()
        .map_err(|_| format!("'{}' has a malformed exponent", raw))?;
    if exponent.abs() > MAX_EXPONENT {
        return Err(format!("'{}' is out of range", raw));
    }

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{}{}", whole, fraction);
    let point = whole.len() as i64 + exponent;

    let expanded = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}", digits, "0".repeat(point as usize - digits.len()))
    } else {
        let (int_part, frac_part) = digits.split_at(point as usize);
        format!("{}.{}", int_part, frac_part)
    };
    Ok(expanded)
}

fn parse_ether_amount(raw: &str) -> Result<U256, String> {
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };
    let digits_ok = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_ok(whole) || !digits_ok(fraction) {
        return Err(format!("'{}' is not a non-negative decimal ETH amount", raw));
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(format!(
            "'{}' has more than {} decimal places",
            raw, ETHER_DECIMALS
        ));
    }
    let normalized = format!(
        "{}.{}",
        if whole.is_empty() { "0" } else { whole },
        if fraction.is_empty() { "0" } else { fraction }
    );
    parse_ether(&normalized).map_err(|e| format!("'{}' is not a valid ETH amount: {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ether_amounts_convert_to_wei() {
        assert_eq!(
            parse_ether_amount("0.0001").unwrap(),
            U256::from(100_000_000_000_000u64)
        );
        assert_eq!(
            parse_ether_amount("1").unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
        assert_eq!(parse_ether_amount(".5").unwrap(), U256::from(500_000_000_000_000_000u64));
        assert_eq!(parse_ether_amount("0.000000000000000001").unwrap(), U256::from(1u64));
    }

    #[test]
    fn ether_amounts_reject_garbage() {
        for raw in ["", ".", "-1", "1e-5", "abc", "1.2.3", "0.0000000000000000001"] {
            assert!(parse_ether_amount(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn exponent_form_expands_to_plain_decimal() {
        assert_eq!(expand_exponent("1e-7").unwrap(), "0.0000001");
        assert_eq!(expand_exponent("1.5e-7").unwrap(), "0.00000015");
        assert_eq!(expand_exponent("2.5e3").unwrap(), "2500");
        assert_eq!(expand_exponent("1.25e1").unwrap(), "12.5");
        assert_eq!(expand_exponent("1e+21").unwrap(), "1000000000000000000000");
        assert_eq!(expand_exponent("0.25").unwrap(), "0.25");
        assert!(expand_exponent("1e-500").is_err());
        assert!(expand_exponent("1ex").is_err());
    }

    #[test]
    fn uint_rejects_signs_and_overflow() {
        assert!(parse_uint("-5").is_err());
        assert!(parse_uint("+5").is_err());
        assert!(parse_uint("1.5").is_err());
        // 2^256
        assert!(
            parse_uint(
                "115792089237316195423570985008687907853269984665640564039457584007913129639936"
            )
            .is_err()
        );
        assert_eq!(parse_uint("42").unwrap(), U256::from(42u64));
    }

    #[test]
    fn address_requires_prefix_and_length() {
        assert!(parse_address("a633656593bB24252A55A468146fe9536eA899cB").is_err());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("0xzz33656593bB24252A55A468146fe9536eA899cB").is_err());
        assert!(parse_address(" 0xa633656593bB24252A55A468146fe9536eA899cB ").is_ok());
    }
}
