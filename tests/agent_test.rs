use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chainbot::agent::{Agent, system_prompt};
use chainbot::error::{ChatbotError, ChatbotResult};
use chainbot::providers::{
    ChatMessage, ChatRequest, ChatResponse, FunctionCall, ProviderClient, Role, ToolCall,
};
use chainbot::tools::ToolRegistry;

mod common;
use common::{MockReader, MockSender, abc_hash, contract_address, dispatcher};

/// Replays canned assistant messages and records what it was sent.
struct ScriptedProvider {
    replies: Mutex<VecDeque<ChatMessage>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<ChatMessage>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn chat_completion(&self, request: &ChatRequest) -> ChatbotResult<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let message = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ChatbotError::provider("script exhausted"))?;
        Ok(ChatResponse {
            message,
            model: "scripted".to_string(),
            usage: None,
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn get_default_model(&self) -> &str {
        "scripted"
    }
}

fn tool_call(id: &str, name: &str, arguments: &str) -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: None,
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }],
        tool_call_id: None,
    }
}

fn agent(provider: Arc<ScriptedProvider>, reader: Arc<MockReader>, sender: Arc<MockSender>) -> Agent {
    let tools = ToolRegistry::new(Arc::new(dispatcher(reader, sender)));
    Agent::new(provider, tools, system_prompt(contract_address(), "base-sepolia"))
}

#[tokio::test]
async fn executes_requested_tool_then_answers() -> ChatbotResult<()> {
    let provider = ScriptedProvider::new(vec![
        tool_call("call_1", "getCounter", "{}"),
        ChatMessage::assistant("The counter is 3."),
    ]);
    let reader = MockReader::returning(&[3]);
    let mut agent = agent(provider.clone(), reader.clone(), MockSender::returning(abc_hash()));

    let reply = agent.respond("what is the counter?").await?;

    assert_eq!(reply.content, "The counter is 3.");
    assert_eq!(reply.tool_executions.len(), 1);
    assert!(reply.tool_executions[0].output.success);
    assert_eq!(reader.calls(), 1);
    assert_eq!(provider.request_count(), 2);

    let tool_message = agent
        .history()
        .iter()
        .find(|m| m.role == Role::Tool)
        .unwrap();
    assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
    assert!(tool_message.content.as_deref().unwrap().contains("Counter value: 3"));

    let first_request = &provider.requests.lock().unwrap()[0];
    assert_eq!(first_request.tools.len(), 8);
    assert_eq!(first_request.messages[0].role, Role::System);
    Ok(())
}

#[tokio::test]
async fn tool_errors_are_returned_to_the_model() -> ChatbotResult<()> {
    let provider = ScriptedProvider::new(vec![
        tool_call("call_1", "depositERC20", r#"{"token":"0xbad","amount":"1"}"#),
        ChatMessage::assistant("That token address is invalid."),
    ]);
    let sender = MockSender::returning(abc_hash());
    let mut agent = agent(provider, MockReader::returning(&[]), sender.clone());

    let reply = agent.respond("deposit 1 of 0xbad").await?;

    assert_eq!(sender.calls(), 0);
    assert!(!reply.tool_executions[0].output.success);
    let tool_message = agent.history().iter().find(|m| m.role == Role::Tool).unwrap();
    assert!(tool_message.content.as_deref().unwrap().starts_with("Error:"));
    Ok(())
}

#[tokio::test]
async fn history_persists_across_turns() -> ChatbotResult<()> {
    let provider = ScriptedProvider::new(vec![
        ChatMessage::assistant("Hello!"),
        ChatMessage::assistant("Still here."),
    ]);
    let mut agent = agent(provider.clone(), MockReader::returning(&[]), MockSender::returning(abc_hash()));

    agent.respond("hi").await?;
    agent.respond("are you there?").await?;

    // system + 2 * (user + assistant)
    assert_eq!(agent.history().len(), 5);
    assert_eq!(provider.requests.lock().unwrap()[1].messages.len(), 4);
    Ok(())
}

#[tokio::test]
async fn stops_after_max_tool_rounds() {
    let provider = ScriptedProvider::new(vec![
        tool_call("a", "getCounter", ""),
        tool_call("b", "getCounter", ""),
        tool_call("c", "getCounter", ""),
    ]);
    let mut agent = agent(provider, MockReader::returning(&[1, 2, 3]), MockSender::returning(abc_hash()))
        .with_max_tool_rounds(2);

    let result = agent.respond("loop forever").await;

    assert!(matches!(result, Err(ChatbotError::Provider(_))));
}

#[test]
fn system_prompt_names_contract_and_network() {
    let prompt = system_prompt(contract_address(), "base-sepolia");
    assert!(prompt.contains(&contract_address().to_string()));
    assert!(prompt.contains("base-sepolia"));
}
