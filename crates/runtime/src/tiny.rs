//! The tool-calling agent loop.

use crate::{Agent, Fragment};
use anyhow::Result;
use futures_core::Stream;
use llm::{General, LLM, Message, Tool, ToolCall};
use mcp::{McpBridge, ServerDescriptor};

/// Model rounds allowed per user turn.
pub const MAX_TURNS: usize = 10;

/// Loop-control tool: the model declares the task finished.
pub const TASK_COMPLETE: &str = "task_complete";

/// Loop-control tool: the model hands the turn back with a question.
pub const ASK_QUESTION: &str = "ask_question";

/// System prompt used unless one is set explicitly.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an agent working on the user's request with \
the tools available to you. Keep going until the request is fully resolved before ending your \
turn. Use tools to look things up instead of guessing. When the task is done call \
`task_complete`; when you need more information call `ask_question`.";

/// An agent that alternates model rounds with MCP tool dispatch.
///
/// Owns the provider, the MCP bridge and the conversation history. History
/// persists across turns for the lifetime of the agent.
pub struct TinyAgent<P: LLM> {
    provider: P,
    config: General,
    bridge: McpBridge,
    servers: Vec<ServerDescriptor>,
    system_prompt: String,
    history: Vec<Message>,
    tools: Vec<Tool>,
    max_turns: usize,
    /// History length at the start of the unfinished turn, if any.
    checkpoint: Option<usize>,
}

impl<P: LLM> TinyAgent<P> {
    /// Create an agent that will spawn `servers` on [`Agent::load_tools`].
    pub fn new(provider: P, config: General, servers: Vec<ServerDescriptor>) -> Self {
        Self {
            provider,
            config,
            bridge: McpBridge::new(),
            servers,
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            history: Vec::new(),
            tools: loop_tools(),
            max_turns: MAX_TURNS,
            checkpoint: None,
        }
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the model round limit per turn.
    pub fn max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    /// Tools offered to the model.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Servers declared or attached so far.
    pub fn servers(&self) -> &[ServerDescriptor] {
        &self.servers
    }

    /// Conversation history.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Stop all connected tool servers.
    pub async fn shutdown(&self) {
        self.bridge.shutdown().await;
    }

    async fn refresh_tools(&mut self) {
        let mut tools = self.bridge.tools().await;
        tools.extend(loop_tools());
        self.tools = tools;
    }

    /// Drop whatever an abandoned turn left behind.
    fn rollback(&mut self) {
        if let Some(mark) = self.checkpoint.take() {
            tracing::debug!(
                "discarding {} messages from an unfinished turn",
                self.history.len().saturating_sub(mark)
            );
            self.history.truncate(mark);
        }
    }
}

impl<P: LLM> Agent for TinyAgent<P> {
    async fn load_tools(&mut self) -> Result<()> {
        let mut failures = Vec::new();
        for server in &self.servers {
            if let Err(e) = self.bridge.connect(server).await {
                tracing::warn!("failed to connect `{server}`: {e:#}");
                failures.push(format!("`{server}`: {e:#}"));
            }
        }
        self.refresh_tools().await;

        if !failures.is_empty() {
            anyhow::bail!(
                "failed to load tools from {} server(s): {}",
                failures.len(),
                failures.join("; ")
            );
        }
        Ok(())
    }

    async fn add_server(&mut self, server: ServerDescriptor) -> Result<()> {
        self.bridge.connect(&server).await?;
        self.servers.push(server);
        self.refresh_tools().await;
        Ok(())
    }

    fn run<'a>(&'a mut self, input: &'a str) -> impl Stream<Item = Result<Fragment>> + Send + 'a {
        async_stream::try_stream! {
            self.rollback();
            self.checkpoint = Some(self.history.len());
            if self.history.is_empty() && !self.system_prompt.is_empty() {
                self.history.push(Message::system(self.system_prompt.clone()));
            }
            self.history.push(Message::user(input));

            for round in 0..self.max_turns {
                let config = self.config.clone().with_tools(self.tools.clone());
                let response = self.provider.send(&config, &self.history).await?;
                let message = response
                    .message()
                    .ok_or_else(|| anyhow::anyhow!("model returned no choices"))?;
                let calls: Vec<ToolCall> = message.tool_calls.to_vec();

                if !message.content.trim().is_empty() {
                    yield Fragment::agent(message.content.clone());
                }
                self.history.push(message);

                if calls.is_empty() {
                    self.checkpoint = None;
                    return;
                }

                let mut finished = false;
                for call in &calls {
                    yield Fragment::tool_call(call);
                    let name = call.function.name.as_str();
                    let output = if is_loop_tool(name) {
                        finished = true;
                        format!("{name} acknowledged")
                    } else {
                        self.bridge.call(name, &call.function.arguments).await
                    };
                    self.history.push(Message::tool(output.clone(), call.id.as_str()));
                    yield Fragment::tool(output);
                }

                if finished {
                    self.checkpoint = None;
                    return;
                }
                tracing::debug!("round {round} dispatched {} tool calls", calls.len());
            }

            tracing::warn!("turn stopped after {} model rounds", self.max_turns);
            self.checkpoint = None;
        }
    }
}

fn is_loop_tool(name: &str) -> bool {
    name == TASK_COMPLETE || name == ASK_QUESTION
}

fn loop_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: TASK_COMPLETE.into(),
            description: "Call this tool when the task given by the user is complete".into(),
            parameters: schemars::json_schema!({ "type": "object", "properties": {} }),
        },
        Tool {
            name: ASK_QUESTION.into(),
            description: "Ask the user a question to get information required to solve or \
                          clarify their problem"
                .into(),
            parameters: schemars::json_schema!({ "type": "object", "properties": {} }),
        },
    ]
}
