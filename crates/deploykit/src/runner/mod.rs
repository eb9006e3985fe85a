//! Command runner abstraction.
//!
//! The [`CommandRunner`] trait is the only place the pipeline touches
//! external processes, enabling:
//! - Real execution via [`system::SystemRunner`]
//! - Scripted responses via [`MockRunner`] for testing
//!
//! Runners report failures as [`Error`]s from [`CommandRunner::execute`].
//! [`CommandRunner::run`] is the boundary that turns those errors into a
//! printed diagnostic and `None`, so nothing propagates past it.

pub mod system;

use crate::error::{Error, Result};
use crate::report::Reporter;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};

/// What to do with a command's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Capture stdout and stderr; stdout is returned trimmed
    Capture,
    /// Let the process write straight to the console
    Stream,
}

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Message shown when the command fails
    pub label: String,
    /// Output handling
    pub mode: OutputMode,
}

impl Invocation {
    /// Create a captured invocation with no arguments.
    pub fn new(program: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            label: label.into(),
            mode: OutputMode::Capture,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Stream output live instead of capturing it.
    pub fn streamed(mut self) -> Self {
        self.mode = OutputMode::Stream;
        self
    }

    /// Whether output is captured.
    pub fn captures(&self) -> bool {
        self.mode == OutputMode::Capture
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Trimmed standard output
    Captured(String),
    /// Output went to the console; the command succeeded
    Streamed,
}

impl Outcome {
    /// Captured stdout, if any.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Self::Captured(out) => Some(out),
            Self::Streamed => None,
        }
    }
}

/// Executes external commands synchronously.
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion.
    ///
    /// Returns `Error::Spawn` if the program could not be started and
    /// `Error::CommandFailed` if it exited unsuccessfully.
    fn execute(&self, invocation: &Invocation) -> Result<Outcome>;

    /// Run the command, reporting any failure and returning `None` for it.
    fn run(&self, invocation: &Invocation, reporter: &dyn Reporter) -> Option<Outcome> {
        log::debug!("running: {invocation}");

        match self.execute(invocation) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::debug!("{} failed: {e}", invocation.program);
                reporter.error(&invocation.label);
                match &e {
                    Error::Spawn { .. } => reporter.detail(&format!("Error details: {e}")),
                    _ if invocation.captures() => {
                        if let Some(stderr) = e.stderr() {
                            reporter.detail(&format!("Error details: {stderr}"));
                        }
                    }
                    _ => {}
                }
                None
            }
        }
    }
}

/// Scripted response returned by [`MockRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Exit 0 with the given stdout
    Success(String),
    /// Exit non-zero with the given stderr
    Failure {
        /// Exit code
        status: i32,
        /// Standard error
        stderr: String,
    },
    /// The program could not be started
    NotFound,
}

/// Runner that records invocations and answers from scripted rules.
///
/// A rule matches when its pattern occurs anywhere in the invocation's
/// command line; the first matching rule wins. Unmatched invocations
/// succeed with empty output.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    rules: Arc<Mutex<Vec<(String, MockResponse)>>>,
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands containing `pattern` with `response`.
    pub fn respond(&self, pattern: impl Into<String>, response: MockResponse) -> &Self {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push((pattern.into(), response));
        }
        self
    }

    /// Commands containing `pattern` succeed with `stdout`.
    pub fn succeed_with(&self, pattern: impl Into<String>, stdout: impl Into<String>) -> &Self {
        self.respond(pattern, MockResponse::Success(stdout.into()))
    }

    /// Commands containing `pattern` exit 1 with `stderr`.
    pub fn fail(&self, pattern: impl Into<String>, stderr: impl Into<String>) -> &Self {
        self.respond(
            pattern,
            MockResponse::Failure {
                status: 1,
                stderr: stderr.into(),
            },
        )
    }

    /// Every invocation executed so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn response_for(&self, command_line: &str) -> MockResponse {
        self.rules
            .lock()
            .ok()
            .and_then(|rules| {
                rules
                    .iter()
                    .find(|(pattern, _)| command_line.contains(pattern.as_str()))
                    .map(|(_, response)| response.clone())
            })
            .unwrap_or_else(|| MockResponse::Success(String::new()))
    }
}

impl CommandRunner for MockRunner {
    fn execute(&self, invocation: &Invocation) -> Result<Outcome> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }

        match self.response_for(&invocation.to_string()) {
            MockResponse::Success(stdout) => Ok(match invocation.mode {
                OutputMode::Capture => Outcome::Captured(stdout.trim().to_string()),
                OutputMode::Stream => Outcome::Streamed,
            }),
            MockResponse::Failure { status, stderr } => Err(Error::CommandFailed {
                program: invocation.program.clone(),
                status: Some(status),
                stderr: if invocation.captures() {
                    stderr
                } else {
                    String::new()
                },
            }),
            MockResponse::NotFound => Err(Error::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
        }
    }
}
