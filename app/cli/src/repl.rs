//! Interactive chat REPL with persistent history.

use crate::terminal::{TurnEnd, stream_to_terminal};
use anyhow::Result;
use runtime::Agent;
use rustyline::error::ReadlineError;
use std::{
    io::{IsTerminal, Write},
    path::PathBuf,
    time::Duration,
};

/// Prompt shown before each line.
pub const PROMPT: &str = "User: ";

/// What a line of input asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// `exit` or `quit`, any case.
    Exit,
    /// Empty or whitespace only.
    Blank,
    /// Anything else, passed to the agent verbatim.
    Turn(&'a str),
}

impl<'a> Input<'a> {
    /// Classify a raw line.
    ///
    /// The exit keywords must match the whole line, so `" exit"` starts a
    /// turn.
    pub fn classify(line: &'a str) -> Self {
        let lower = line.to_lowercase();
        if lower == "exit" || lower == "quit" {
            Self::Exit
        } else if line.trim().is_empty() {
            Self::Blank
        } else {
            Self::Turn(line)
        }
    }
}

/// Source of user lines.
pub trait LineReader {
    /// Read one line. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Whether `read_line` shows the prompt itself. When it does not, the
    /// REPL writes the prompt to its output instead.
    fn shows_prompt(&self) -> bool {
        true
    }

    /// Release the input. Called once when the loop stops.
    fn close(&mut self) {}
}

/// Line editor backed by rustyline, with history at
/// `~/.config/tinyagent/history`.
pub struct Editor {
    editor: rustyline::DefaultEditor,
    history_path: Option<PathBuf>,
}

impl Editor {
    /// Create an editor and load any saved history.
    pub fn new() -> Result<Self> {
        let mut editor = rustyline::DefaultEditor::new()?;
        let history_path = history_file_path();
        if let Some(ref path) = history_path {
            let _ = editor.load_history(path);
        }
        Ok(Self {
            editor,
            history_path,
        })
    }
}

impl LineReader for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl+C at the prompt re-prompts.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // rustyline stays silent about the prompt when stdin is piped.
    fn shows_prompt(&self) -> bool {
        std::io::stdin().is_terminal()
    }

    fn close(&mut self) {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(path);
        }
    }
}

/// Resolve the history file path at `~/.config/tinyagent/history`.
fn history_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tinyagent").join("history"))
}

/// Interactive chat REPL, generic over the agent and the line source.
pub struct ChatRepl<'a, A: Agent, R: LineReader> {
    agent: &'a mut A,
    reader: R,
    turn_timeout: Option<Duration>,
}

impl<'a, A: Agent, R: LineReader> ChatRepl<'a, A, R> {
    /// Create a REPL driving `agent` with lines from `reader`.
    pub fn new(agent: &'a mut A, reader: R) -> Self {
        Self {
            agent,
            reader,
            turn_timeout: None,
        }
    }

    /// Drop any turn that runs longer than `timeout`.
    pub fn turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Run until an exit keyword or end of input.
    ///
    /// Turn failures are reported on `err` and never stop the loop.
    pub async fn run(&mut self, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
        let result = self.drive(out, err).await;
        self.reader.close();
        result
    }

    async fn drive(&mut self, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
        loop {
            let prompt = if self.reader.shows_prompt() {
                PROMPT
            } else {
                write!(out, "{PROMPT}")?;
                out.flush()?;
                ""
            };
            let Some(line) = self.reader.read_line(prompt)? else {
                break;
            };
            match Input::classify(&line) {
                Input::Exit => {
                    writeln!(out, "Exiting agent...")?;
                    break;
                }
                Input::Blank => continue,
                Input::Turn(input) => {
                    let stream = self.agent.run(input);
                    let end = stream_to_terminal(stream, self.turn_timeout, out, err).await?;
                    if end != TurnEnd::Completed {
                        tracing::debug!("turn ended early: {end:?}");
                    }
                }
            }
        }
        Ok(())
    }
}
