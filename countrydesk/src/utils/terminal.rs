//! # Terminal Input Helper
//!
//! Utilities for asking the user for input. A prompt is repeated until the
//! answer satisfies the provided validation filters.
//!
//! The core functionality relies on [`Sanitize`] for input validation. Lines
//! come from a [`LineSource`]:
//! - [`StdinSource`] reads the process stdin and turns Ctrl+C into
//!   [`TerminalErrors::Interrupted`].
//! - [`ScriptedSource`] replays fixed answers, for tests and automation.
//!
//! ## Features
//! - Continuously prompts the user until valid input is received.
//! - Supports multiple validation rules simultaneously.
//! - Optional answers, where a blank line keeps the current value.
//! - Interrupts and end-of-input propagate as errors so the caller decides
//!   what happens to unsaved data.
//!
//! ## Usage
//!
//! ```rust
//! use countrydesk::utils::{DesiredType, Sanitize, ScriptedSource, Terminal};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut terminal = Terminal::new(ScriptedSource::new(["abc", "42"]));
//!
//! let answer = terminal
//!     .ask("Population: ", &[Sanitize::NotEmpty, Sanitize::IsType(DesiredType::U64)])
//!     .await
//!     .unwrap();
//!
//! assert_eq!(answer, "42");
//! # });
//! ```
use crate::utils::sanitize::{DesiredType, Sanitize};
use async_trait::async_trait;
use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
    thread,
};
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum TerminalErrors {
    #[error("Interrupted by the user")]
    Interrupted,
    #[error("Input closed")]
    Closed,
    #[error("Couldn't read line: {0}")]
    Io(#[from] io::Error),
}

/// Something that yields lines typed by the user.
#[async_trait]
pub trait LineSource: Send {
    /// Waits for the next line, without its line terminator.
    async fn next_line(&mut self) -> Result<String, TerminalErrors>;
}

/// A helper for repeatedly asking the user for input until it passes all [`Sanitize`] filters.
/// Internally calls [`Sanitize::execute`].
pub struct Terminal<S> {
    source: S,
}

impl<S> Terminal<S> {
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: LineSource> Terminal<S> {
    pub fn new(source: S) -> Terminal<S> {
        Terminal { source }
    }

    /// Prints a question and loops until a valid answer is received.
    /// Returns the trimmed answer.
    pub async fn ask(
        &mut self,
        question: &str,
        filters: &[Sanitize],
    ) -> Result<String, TerminalErrors> {
        loop {
            prompt(question);
            let answer = self.source.next_line().await?;

            match Sanitize::execute(&answer, filters) {
                Ok(data) => return Ok(data),
                Err(e) => println!("{}", e),
            }
        }
    }

    /// Like [`Terminal::ask`], but a blank answer returns `None` without
    /// running the filters.
    pub async fn ask_optional(
        &mut self,
        question: &str,
        filters: &[Sanitize],
    ) -> Result<Option<String>, TerminalErrors> {
        loop {
            prompt(question);
            let answer = self.source.next_line().await?;
            if answer.trim().is_empty() {
                return Ok(None);
            }

            match Sanitize::execute(&answer, filters) {
                Ok(data) => return Ok(Some(data)),
                Err(e) => println!("{}", e),
            }
        }
    }

    /// Asks for a required non-negative integer.
    pub async fn ask_u64(&mut self, question: &str) -> Result<u64, TerminalErrors> {
        let answer = self
            .ask(question, &[Sanitize::NotEmpty, Sanitize::IsType(DesiredType::U64)])
            .await?;
        Ok(answer.parse().unwrap_or_default())
    }

    /// Asks for a non-negative integer, blank keeps the current value.
    pub async fn ask_optional_u64(
        &mut self,
        question: &str,
    ) -> Result<Option<u64>, TerminalErrors> {
        let answer = self
            .ask_optional(question, &[Sanitize::IsType(DesiredType::U64)])
            .await?;
        Ok(answer.and_then(|a| a.parse().ok()))
    }

    /// Asks for a number in `[min, max]`.
    pub async fn ask_between(
        &mut self,
        question: &str,
        min: usize,
        max: usize,
    ) -> Result<usize, TerminalErrors> {
        let answer = self
            .ask(question, &[Sanitize::IsBetween(min as isize, max as isize)])
            .await?;
        Ok(answer.parse().unwrap_or(min))
    }

    /// Asks a yes/no question.
    pub async fn confirm(&mut self, question: &str) -> Result<bool, TerminalErrors> {
        let answer = self.ask(question, &[Sanitize::yes_no()]).await?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }
}

fn prompt(question: &str) {
    print!("{}", question);
    let _ = io::stdout().flush();
}

/// Reads stdin on a dedicated thread and listens for Ctrl+C.
///
/// Must be created from inside a Tokio runtime. Once created, Ctrl+C no longer
/// kills the process; it is reported by the next call to
/// [`LineSource::next_line`] as [`TerminalErrors::Interrupted`].
pub struct StdinSource {
    lines: mpsc::UnboundedReceiver<io::Result<String>>,
    interrupts: mpsc::UnboundedReceiver<()>,
}

impl StdinSource {
    pub fn spawn() -> StdinSource {
        let (line_tx, lines) = mpsc::unbounded_channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            let mut handle = stdin.lock();
            loop {
                let mut buf = Vec::new();
                match handle.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        if line_tx.send(Ok(decode_line(buf))).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = line_tx.send(Err(e));
                        break;
                    }
                }
            }
        });

        let (interrupt_tx, interrupts) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to install Ctrl+C handler: {}", e);
                    break;
                }
                tracing::debug!("Received SIGINT");
                if interrupt_tx.send(()).is_err() {
                    break;
                }
            }
        });

        StdinSource { lines, interrupts }
    }
}

#[async_trait]
impl LineSource for StdinSource {
    async fn next_line(&mut self) -> Result<String, TerminalErrors> {
        tokio::select! {
            biased;
            Some(()) = self.interrupts.recv() => {
                println!();
                Err(TerminalErrors::Interrupted)
            }
            line = self.lines.recv() => match line {
                Some(Ok(line)) => Ok(line),
                Some(Err(e)) => Err(TerminalErrors::Io(e)),
                None => Err(TerminalErrors::Closed),
            },
        }
    }
}

/// Turns raw stdin bytes into a line without its terminator. Invalid UTF-8
/// is replaced with U+FFFD so the answer fails validation and is asked
/// again instead of ending the session.
fn decode_line(buf: Vec<u8>) -> String {
    let line = match String::from_utf8(buf) {
        Ok(line) => line,
        Err(e) => {
            tracing::warn!("Input line is not valid UTF-8");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    strip_newline(line)
}

fn strip_newline(mut line: String) -> String {
    while line.ends_with(['\n', '\r']) {
        line.pop();
    }
    line
}

/// Replays a fixed list of answers.
///
/// When the script runs out, the next read fails with
/// [`TerminalErrors::Closed`], or [`TerminalErrors::Interrupted`] if
/// [`ScriptedSource::then_interrupt`] was called.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
    interrupt_at_end: bool,
}

impl ScriptedSource {
    pub fn new<I, L>(lines: I) -> ScriptedSource
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        ScriptedSource {
            lines: lines.into_iter().map(Into::into).collect(),
            interrupt_at_end: false,
        }
    }

    pub fn then_interrupt(mut self) -> ScriptedSource {
        self.interrupt_at_end = true;
        self
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl LineSource for ScriptedSource {
    async fn next_line(&mut self) -> Result<String, TerminalErrors> {
        match self.lines.pop_front() {
            Some(line) => {
                println!("{}", line);
                Ok(line)
            }
            None if self.interrupt_at_end => Err(TerminalErrors::Interrupted),
            None => Err(TerminalErrors::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal<const N: usize>(lines: [&str; N]) -> Terminal<ScriptedSource> {
        Terminal::new(ScriptedSource::new(lines))
    }

    #[tokio::test]
    async fn test_terminal_ask_reprompts_until_valid() {
        let mut t = terminal(["", "   ", "Chile"]);
        let answer = t.ask("Name: ", &[Sanitize::NotEmpty]).await.unwrap();
        assert_eq!(answer, "Chile");
        assert_eq!(t.source().remaining(), 0);
    }

    #[tokio::test]
    async fn test_terminal_ask_u64_rejects_non_integers() {
        let mut t = terminal(["abc", "-3", "1.5", "19116209"]);
        assert_eq!(t.ask_u64("Population: ").await.unwrap(), 19116209);
    }

    #[tokio::test]
    async fn test_terminal_optional_blank_keeps() {
        let mut t = terminal(["", "x", "7"]);
        assert_eq!(t.ask_optional_u64("New area: ").await.unwrap(), None);
        assert_eq!(t.ask_optional_u64("New area: ").await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_terminal_ask_between() {
        let mut t = terminal(["0", "12", "menu", "11"]);
        assert_eq!(t.ask_between("Option: ", 1, 11).await.unwrap(), 11);
    }

    #[tokio::test]
    async fn test_terminal_confirm() {
        let mut t = terminal(["maybe", "Y", "n"]);
        assert!(t.confirm("Save? ").await.unwrap());
        assert!(!t.confirm("Save? ").await.unwrap());
    }

    #[tokio::test]
    async fn test_terminal_end_of_script() {
        let mut t = terminal([]);
        assert!(matches!(
            t.ask("Name: ", &[]).await,
            Err(TerminalErrors::Closed)
        ));

        let mut t = Terminal::new(ScriptedSource::new(["x"]).then_interrupt());
        assert!(matches!(
            t.ask("Name: ", &[Sanitize::IsType(DesiredType::U64)]).await,
            Err(TerminalErrors::Interrupted)
        ));
    }

    #[test]
    fn test_terminal_decode_line() {
        assert_eq!(decode_line(b"11\n".to_vec()), "11");
        assert_eq!(decode_line("Perú\r\n".as_bytes().to_vec()), "Perú");
        assert_eq!(decode_line(b"\xff\xfe\n".to_vec()), "\u{FFFD}\u{FFFD}");
    }

    #[tokio::test]
    async fn test_terminal_invalid_utf8_line_is_reprompted() {
        let bad = decode_line(b"\xff\xfe\n".to_vec());
        let mut t = Terminal::new(ScriptedSource::new([bad, "1".to_string()]));
        assert_eq!(t.ask_between("Option: ", 1, 11).await.unwrap(), 1);
        assert_eq!(t.source().remaining(), 0);
    }

    #[test]
    fn test_terminal_strip_newline() {
        assert_eq!(strip_newline("Perú\r\n".to_string()), "Perú");
        assert_eq!(strip_newline("Perú".to_string()), "Perú");
    }
}
