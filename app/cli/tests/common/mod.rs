//! Scripted agent and line source shared by the CLI tests.
#![allow(dead_code)]

use anyhow::Result;
use futures_core::Stream;
use futures_util::{StreamExt, stream};
use mcp::ServerDescriptor;
use runtime::{Agent, Fragment};
use std::{cell::Cell, collections::VecDeque, rc::Rc};
use tinyagent_cli::repl::LineReader;

/// One scripted turn.
pub enum Turn {
    /// Yield these items, then finish.
    Fragments(Vec<Result<Fragment, String>>),
    /// Never yield anything.
    Hang,
}

/// Agent that replays scripted turns and records what it was asked.
#[derive(Default)]
pub struct ScriptedAgent {
    pub turns: VecDeque<Turn>,
    pub inputs: Vec<String>,
    pub load_error: Option<String>,
    pub add_error: Option<String>,
    pub loads: usize,
    pub added: Vec<ServerDescriptor>,
}

impl ScriptedAgent {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self {
            turns: turns.into(),
            ..Default::default()
        }
    }
}

impl Agent for ScriptedAgent {
    async fn load_tools(&mut self) -> Result<()> {
        self.loads += 1;
        match &self.load_error {
            Some(e) => Err(anyhow::anyhow!("{e}")),
            None => Ok(()),
        }
    }

    async fn add_server(&mut self, server: ServerDescriptor) -> Result<()> {
        if let Some(e) = &self.add_error {
            anyhow::bail!("{e}");
        }
        self.added.push(server);
        Ok(())
    }

    fn run<'a>(&'a mut self, input: &'a str) -> impl Stream<Item = Result<Fragment>> + Send + 'a {
        self.inputs.push(input.to_owned());
        match self.turns.pop_front() {
            Some(Turn::Fragments(items)) => {
                stream::iter(items.into_iter().map(|r| r.map_err(anyhow::Error::msg))).boxed()
            }
            Some(Turn::Hang) => stream::pending::<Result<Fragment>>().boxed(),
            None => stream::empty::<Result<Fragment>>().boxed(),
        }
    }
}

/// Line source fed from a fixed list; end of input after the last line.
pub struct Lines {
    lines: VecDeque<String>,
    shows_prompt: bool,
    pub prompts: Rc<Cell<usize>>,
    pub closed: Rc<Cell<bool>>,
}

impl Lines {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            shows_prompt: true,
            prompts: Rc::default(),
            closed: Rc::default(),
        }
    }

    /// Like a non-terminal stdin: the prompt is left to the REPL.
    pub fn piped(lines: &[&str]) -> Self {
        Self {
            shows_prompt: false,
            ..Self::new(lines)
        }
    }
}

impl LineReader for Lines {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        assert_eq!(prompt, if self.shows_prompt { "User: " } else { "" });
        self.prompts.set(self.prompts.get() + 1);
        Ok(self.lines.pop_front())
    }

    fn shows_prompt(&self) -> bool {
        self.shows_prompt
    }

    fn close(&mut self) {
        self.closed.set(true);
    }
}
