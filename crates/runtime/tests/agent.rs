//! Tests for the TinyAgent loop, driven by a scripted provider.

use anyhow::Result;
use futures_util::StreamExt;
use llm::{General, LLM, Message, Response, Role};
use mcp::ServerDescriptor;
use serde_json::json;
use std::{
    collections::VecDeque,
    pin::pin,
    sync::{Arc, Mutex},
};
use tinyagent_runtime::{Agent, Fragment, FragmentKind, Payload, TASK_COMPLETE, TinyAgent};

/// Replays canned responses and records every request.
#[derive(Clone, Default)]
struct Scripted {
    responses: Arc<Mutex<VecDeque<Result<Response, String>>>>,
    requests: Arc<Mutex<Vec<(General, Vec<Message>)>>>,
}

impl Scripted {
    fn new(responses: Vec<Result<Response, String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            ..Default::default()
        }
    }

    fn requests(&self) -> Vec<(General, Vec<Message>)> {
        self.requests.lock().unwrap().clone()
    }
}

impl LLM for Scripted {
    async fn send(&self, config: &General, messages: &[Message]) -> Result<Response> {
        self.requests
            .lock()
            .unwrap()
            .push((config.clone(), messages.to_vec()));
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(e)) => Err(anyhow::anyhow!(e)),
            None => anyhow::bail!("script exhausted"),
        }
    }
}

fn text(content: &str) -> Result<Response, String> {
    Ok(serde_json::from_value(json!({
        "choices": [{ "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }]
    }))
    .unwrap())
}

fn call(content: Option<&str>, id: &str, name: &str, arguments: &str) -> Result<Response, String> {
    Ok(serde_json::from_value(json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": content,
                "tool_calls": [{
                    "id": id,
                    "type": "function",
                    "function": { "name": name, "arguments": arguments }
                }]
            },
            "finish_reason": "tool_calls"
        }]
    }))
    .unwrap())
}

fn agent(provider: Scripted) -> TinyAgent<Scripted> {
    TinyAgent::new(provider, General::new("test-model"), Vec::new())
}

async fn collect(agent: &mut TinyAgent<Scripted>, input: &str) -> Vec<Result<Fragment>> {
    agent.run(input).collect().await
}

#[tokio::test]
async fn text_reply_yields_one_agent_fragment() {
    let provider = Scripted::new(vec![text("Hello")]);
    let mut agent = agent(provider.clone());

    let fragments = collect(&mut agent, "hi").await;
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].as_ref().unwrap(), &Fragment::agent("Hello"));

    let roles: Vec<Role> = agent.history().iter().map(|m| m.role).collect();
    assert_eq!(roles, [Role::System, Role::User, Role::Assistant]);
    assert_eq!(provider.requests()[0].0.model, "test-model");
}

#[tokio::test]
async fn loop_tools_are_offered_to_the_model() {
    let provider = Scripted::new(vec![text("ok")]);
    let mut agent = agent(provider.clone());
    let _ = collect(&mut agent, "hi").await;

    let (config, _) = &provider.requests()[0];
    let names: Vec<String> = config
        .tools
        .as_ref()
        .expect("tools")
        .iter()
        .map(|t| t.name.clone())
        .collect();
    assert!(names.contains(&TASK_COMPLETE.to_owned()));
    assert!(names.contains(&"ask_question".to_owned()));
}

#[tokio::test]
async fn tool_round_feeds_result_back() {
    let provider = Scripted::new(vec![
        call(None, "call_1", "lookup", r#"{"q":"weather"}"#),
        text("It is sunny."),
    ]);
    let mut agent = agent(provider.clone());

    let fragments: Vec<Fragment> = collect(&mut agent, "weather?")
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    let kinds: Vec<FragmentKind> = fragments.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        [FragmentKind::ToolCall, FragmentKind::Tool, FragmentKind::Agent]
    );
    assert_eq!(
        fragments[0].payload,
        Some(Payload::Json(json!({ "name": "lookup", "arguments": { "q": "weather" } })))
    );
    match &fragments[1].payload {
        Some(Payload::Text(output)) => assert!(output.contains("not available")),
        other => panic!("expected text payload, got {other:?}"),
    }

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    let tool_message = requests[1].1.last().unwrap();
    assert_eq!(tool_message.role, Role::Tool);
    assert_eq!(tool_message.tool_call_id, "call_1");
}

#[tokio::test]
async fn task_complete_ends_the_turn() {
    let provider = Scripted::new(vec![call(Some("All set."), "call_7", TASK_COMPLETE, "{}")]);
    let mut agent = agent(provider.clone());

    let fragments: Vec<Fragment> = collect(&mut agent, "do it")
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments[0], Fragment::agent("All set."));
    assert_eq!(fragments[1].kind, FragmentKind::ToolCall);
    assert_eq!(fragments[2].kind, FragmentKind::Tool);
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn history_persists_across_turns() {
    let provider = Scripted::new(vec![text("first"), text("second")]);
    let mut agent = agent(provider.clone());

    let _ = collect(&mut agent, "one").await;
    let _ = collect(&mut agent, "two").await;

    let second = &provider.requests()[1].1;
    let contents: Vec<&str> = second.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents[1..], ["one", "first", "two"]);
    assert_eq!(
        second.iter().filter(|m| m.role == Role::System).count(),
        1
    );
}

#[tokio::test]
async fn failed_turn_is_rolled_back() {
    let provider = Scripted::new(vec![Err("boom".into()), text("recovered")]);
    let mut agent = agent(provider.clone());

    let fragments = collect(&mut agent, "lost").await;
    assert_eq!(fragments.len(), 1);
    assert!(fragments[0].as_ref().unwrap_err().to_string().contains("boom"));

    let fragments = collect(&mut agent, "again").await;
    assert_eq!(fragments[0].as_ref().unwrap(), &Fragment::agent("recovered"));

    let second = &provider.requests()[1].1;
    assert!(second.iter().all(|m| m.content != "lost"));
    assert_eq!(second.last().unwrap().content, "again");
}

#[tokio::test]
async fn dropped_turn_leaves_no_dangling_tool_call() {
    let provider = Scripted::new(vec![
        call(None, "call_1", "lookup", "{}"),
        text("fresh"),
    ]);
    let mut agent = agent(provider.clone());

    {
        let mut turn = pin!(agent.run("abandon me"));
        let first = turn.next().await.unwrap().unwrap();
        assert_eq!(first.kind, FragmentKind::ToolCall);
    }

    let fragments = collect(&mut agent, "new question").await;
    assert_eq!(fragments[0].as_ref().unwrap(), &Fragment::agent("fresh"));

    let second = &provider.requests()[1].1;
    assert!(second.iter().all(|m| m.tool_calls.is_empty()));
    assert!(second.iter().all(|m| m.role != Role::Tool));
}

#[tokio::test]
async fn round_limit_stops_the_turn() {
    let provider = Scripted::new(vec![
        call(None, "c1", "lookup", "{}"),
        call(None, "c2", "lookup", "{}"),
        call(None, "c3", "lookup", "{}"),
    ]);
    let mut agent = agent(provider.clone()).max_turns(2);

    let fragments = collect(&mut agent, "loop").await;
    assert!(fragments.iter().all(Result::is_ok));
    assert_eq!(fragments.len(), 4);
    assert_eq!(provider.requests().len(), 2);
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let empty: Response = serde_json::from_value(json!({ "choices": [] })).unwrap();
    let mut agent = agent(Scripted::new(vec![Ok(empty)]));

    let fragments = collect(&mut agent, "hi").await;
    assert!(fragments[0].is_err());
}

#[tokio::test]
async fn load_tools_without_servers_keeps_loop_tools() {
    let mut agent = agent(Scripted::default());
    agent.load_tools().await.unwrap();
    assert_eq!(agent.tools().len(), 2);
}

#[tokio::test]
async fn load_tools_reports_failing_server() {
    let provider = Scripted::default();
    let servers = vec![ServerDescriptor::stdio("tinyagent-missing-server", ["serve"])];
    let mut agent = TinyAgent::new(provider, General::default(), servers);

    let err = agent.load_tools().await.unwrap_err();
    assert!(err.to_string().contains("tinyagent-missing-server serve"));
    assert_eq!(agent.tools().len(), 2);
}

#[tokio::test]
async fn failed_add_server_is_not_recorded() {
    let mut agent = agent(Scripted::default());
    let result = agent
        .add_server(ServerDescriptor::stdio("tinyagent-missing-server", Vec::<String>::new()))
        .await;
    assert!(result.is_err());
    assert!(agent.servers().is_empty());
}

#[tokio::test]
async fn custom_system_prompt_opens_the_history() {
    let provider = Scripted::new(vec![text("ok"), text("again")]);
    let mut agent = agent(provider.clone()).system_prompt("Answer in one word.");
    let _ = collect(&mut agent, "hi").await;
    let _ = collect(&mut agent, "more").await;

    let second = &provider.requests()[1].1;
    assert_eq!(second[0].role, Role::System);
    assert_eq!(second[0].content, "Answer in one word.");
    assert_eq!(second.iter().filter(|m| m.role == Role::System).count(), 1);
}

#[tokio::test]
async fn empty_system_prompt_is_omitted() {
    let provider = Scripted::new(vec![text("ok")]);
    let mut agent = agent(provider.clone()).system_prompt("");
    let _ = collect(&mut agent, "hi").await;
    assert_eq!(provider.requests()[0].1[0].role, Role::User);
}
