use alloy_primitives::{Address, U256};
use serde_json::json;
use std::sync::Arc;

use chainbot::contract::Operation;
use chainbot::error::{ChatbotError, ChatbotResult};
use chainbot::tools::ToolRegistry;

mod common;
use common::{MockReader, MockSender, MockWallet, TOKEN, abc_hash, dispatcher};

fn registry(reader: Arc<MockReader>, sender: Arc<MockSender>) -> ToolRegistry {
    ToolRegistry::new(Arc::new(dispatcher(reader, sender)))
}

#[test]
fn registers_one_tool_per_operation() {
    let tools = registry(MockReader::returning(&[]), MockSender::returning(abc_hash()));

    assert_eq!(tools.len(), Operation::ALL.len());
    let names: Vec<&str> = tools.list_tools().into_iter().map(|(name, _)| name).collect();
    for op in Operation::ALL {
        assert!(names.contains(&op.name()), "missing {op}");
    }
}

#[test]
fn definitions_declare_argument_schema() {
    let tools = registry(MockReader::returning(&[]), MockSender::returning(abc_hash()));
    let definitions = tools.definitions();

    let deposit_erc20 = definitions.iter().find(|d| d.name == "depositERC20").unwrap();
    assert_eq!(deposit_erc20.parameters["type"], "object");
    assert_eq!(deposit_erc20.parameters["required"], json!(["token", "amount"]));
    assert_eq!(deposit_erc20.parameters["additionalProperties"], false);
    assert!(deposit_erc20.parameters["properties"]["token"]["description"].is_string());

    let get_counter = definitions.iter().find(|d| d.name == "getCounter").unwrap();
    assert_eq!(get_counter.parameters["required"], json!([]));
    assert!(!get_counter.description.is_empty());

    let openai = deposit_erc20.to_openai();
    assert_eq!(openai["type"], "function");
    assert_eq!(openai["function"]["name"], "depositERC20");
}

#[tokio::test]
async fn execute_tool_reports_counter() -> ChatbotResult<()> {
    let tools = registry(MockReader::returning(&[42]), MockSender::returning(abc_hash()));

    let output = tools.execute_tool("getCounter", json!({})).await?;

    assert!(output.success);
    assert!(output.content.contains("Counter value: 42"));
    let parsed: serde_json::Value = serde_json::from_str(&output.content)?;
    assert_eq!(parsed["result"]["value"], "42");
    Ok(())
}

#[tokio::test]
async fn execute_tool_reports_transaction_hash() -> ChatbotResult<()> {
    let tools = registry(MockReader::returning(&[]), MockSender::returning(abc_hash()));

    let output = tools
        .execute_tool("depositERC20", json!({ "token": TOKEN, "amount": "5000" }))
        .await?;

    let parsed: serde_json::Value = serde_json::from_str(&output.content)?;
    assert_eq!(parsed["result"]["transaction_hash"], format!("{}", abc_hash()));
    assert_eq!(parsed["result"]["status"], "pending");
    Ok(())
}

#[tokio::test]
async fn unknown_tool_is_unknown_operation() {
    let tools = registry(MockReader::returning(&[]), MockSender::returning(abc_hash()));

    let result = tools.execute_tool("transferOwnership", json!({})).await;

    assert!(matches!(result, Err(ChatbotError::UnknownOperation(_))));
}

#[tokio::test]
async fn invoke_folds_errors_into_output() {
    let reader = MockReader::returning(&[]);
    let sender = MockSender::returning(abc_hash());
    let tools = registry(reader.clone(), sender.clone());

    let output = tools
        .invoke("depositERC20", json!({ "token": "0xbad", "amount": "1" }))
        .await;

    assert!(!output.success);
    assert!(output.to_message().starts_with("Error: [invalid_argument]"));
    assert_eq!(reader.calls() + sender.calls(), 0);

    let output = tools.invoke("selfDestruct", json!({})).await;
    assert!(output.error.unwrap().contains("unknown_operation"));
}

#[tokio::test]
async fn wallet_tool_reports_address_and_balance() -> ChatbotResult<()> {
    let tools = registry(MockReader::returning(&[]), MockSender::returning(abc_hash()))
        .with_wallet(MockWallet::holding(U256::from(1_500_000_000_000_000_000u64)), "base-sepolia");
    assert_eq!(tools.len(), Operation::ALL.len() + 1);
    assert!(tools.definitions().iter().any(|d| d.name == "getWalletDetails"));

    let output = tools.execute_tool("getWalletDetails", json!({})).await?;

    let parsed: serde_json::Value = serde_json::from_str(&output.content)?;
    assert_eq!(parsed["result"]["address"], Address::repeat_byte(0x42).to_string());
    assert_eq!(parsed["result"]["chain_id"], 84532);
    assert_eq!(parsed["result"]["balance_wei"], "1500000000000000000");
    assert!(parsed["summary"].as_str().unwrap().contains("1.5"));
    Ok(())
}

#[tokio::test]
async fn wallet_tool_rejects_arguments_and_surfaces_read_failures() {
    let tools = registry(MockReader::returning(&[]), MockSender::returning(abc_hash()))
        .with_wallet(MockWallet::offline(), "base-sepolia");

    let result = tools.execute_tool("getWalletDetails", json!({ "address": TOKEN })).await;
    assert!(matches!(result, Err(ChatbotError::InvalidArgument(_))));

    let result = tools.execute_tool("getWalletDetails", json!(null)).await;
    assert!(matches!(result, Err(ChatbotError::ReadFailed(_))));
}

#[tokio::test]
async fn tool_names_match_exactly() {
    let reader = MockReader::returning(&[1]);
    let tools = registry(reader.clone(), MockSender::returning(abc_hash()));

    let result = tools.execute_tool("getCounter ", json!({})).await;

    assert!(matches!(result, Err(ChatbotError::UnknownOperation(_))));
    assert_eq!(reader.calls(), 0);
}
