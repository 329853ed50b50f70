//! Terminal output for agent turns.

use anyhow::Result;
use futures_core::Stream;
use futures_util::StreamExt;
use runtime::{Fragment, Payload};
use std::{io::Write, pin::pin, time::Duration};

/// Label printed before agent output.
pub const AGENT_LABEL: &str = "Agent: ";

/// How a turn stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEnd {
    /// The stream ran to completion.
    Completed,
    /// The stream yielded an error.
    Failed,
    /// The user pressed Ctrl+C.
    Cancelled,
    /// The turn deadline passed.
    TimedOut,
}

/// Writes fragments, one line each.
///
/// The label is printed once per run of consecutive agent fragments.
/// Create one per turn.
#[derive(Debug, Default)]
pub struct Renderer {
    label_shown: bool,
}

impl Renderer {
    /// Write one fragment followed by a newline.
    pub fn render(&mut self, fragment: &Fragment, out: &mut impl Write) -> Result<()> {
        if fragment.is_agent() {
            if !self.label_shown {
                write!(out, "{AGENT_LABEL}")?;
                self.label_shown = true;
            }
        } else {
            self.label_shown = false;
        }

        match &fragment.payload {
            None => {}
            Some(Payload::Json(value)) => write!(out, "{}", serde_json::to_string_pretty(value)?)?,
            Some(Payload::Text(text)) => write!(out, "{text}")?,
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

/// Consume a turn and print its fragments as they arrive.
///
/// Ctrl+C or the optional deadline drops the stream. Errors from the stream
/// are reported on `err` and end the turn; only write failures propagate.
pub async fn stream_to_terminal(
    stream: impl Stream<Item = Result<Fragment>>,
    timeout: Option<Duration>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<TurnEnd> {
    let mut stream = pin!(stream);
    let mut renderer = Renderer::default();
    let mut deadline = pin!(async move {
        match timeout {
            Some(timeout) => tokio::time::sleep(timeout).await,
            None => std::future::pending().await,
        }
    });
    let mut ctrl_c = pin!(tokio::signal::ctrl_c());
    let mut ctrl_c_armed = true;

    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(Ok(fragment)) => renderer.render(&fragment, out)?,
                Some(Err(e)) => {
                    writeln!(err, "\nError during agent execution: {e:#}")?;
                    return Ok(TurnEnd::Failed);
                }
                None => return Ok(TurnEnd::Completed),
            },
            _ = &mut deadline => {
                let secs = timeout.map(|t| t.as_secs()).unwrap_or_default();
                writeln!(err, "\nTurn timed out after {secs}s.")?;
                return Ok(TurnEnd::TimedOut);
            }
            signal = &mut ctrl_c, if ctrl_c_armed => match signal {
                Ok(()) => {
                    writeln!(err, "\nTurn cancelled.")?;
                    return Ok(TurnEnd::Cancelled);
                }
                Err(e) => {
                    tracing::warn!("ctrl-c handler unavailable: {e}");
                    ctrl_c_armed = false;
                }
            },
        }
    }
}
