// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Shell command execution with line capture.
//!
//! The child is driven by a current-thread tokio runtime, so the call
//! stays synchronous while still honouring a timeout. A child that
//! outlives the timeout is killed. Lines are captured as raw bytes with one
//! trailing `\n` removed; invalid UTF-8 is replaced, never dropped.

use std::collections::{BTreeMap, HashMap};
use std::process::Stdio;
use std::time::Duration;

use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::process::Command;

use crate::config::CommandConfig;
use crate::error::{IntegrityError, Result};

/// Captured stdout, keyed by zero-based line index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput(BTreeMap<usize, String>);

impl CommandOutput {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut output = Self::default();
        for line in lines {
            output.push(line.into());
        }
        output
    }

    fn push(&mut self, line: String) {
        let index = self.0.len();
        self.0.insert(index, line);
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a command run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Completed(CommandOutput),
    TimedOut,
    LaunchFailed,
}

impl CommandResult {
    /// Collapse to the output detectors look at. Timeouts and launch
    /// failures carry no signal.
    pub fn into_output(self) -> CommandOutput {
        match self {
            CommandResult::Completed(output) => output,
            CommandResult::TimedOut | CommandResult::LaunchFailed => CommandOutput::default(),
        }
    }
}

pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &str) -> CommandResult;
}

/// Runs commands through `<shell> -c`.
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: String,
    timeout: Duration,
}

impl ShellCommandRunner {
    pub fn new(shell: impl Into<String>, timeout: Duration) -> Self {
        Self {
            shell: shell.into(),
            timeout,
        }
    }

    pub fn from_config(config: &CommandConfig) -> Self {
        Self::new(config.shell.clone(), config.timeout())
    }

    async fn run_async(&self, command: &str) -> Result<CommandResult> {
        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| IntegrityError::Launch {
                command: command.to_string(),
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            return Ok(CommandResult::LaunchFailed);
        };

        let mut reader = BufReader::new(stdout);
        let mut output = CommandOutput::default();
        let run = async {
            let mut buf = Vec::new();
            // A read error ends capture like EOF does
            while let Ok(n) = reader.read_until(b'\n', &mut buf).await {
                if n == 0 {
                    break;
                }
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                output.push(String::from_utf8_lossy(&buf).into_owned());
                buf.clear();
            }
            let _ = child.wait().await;
        };

        let finished = tokio::time::timeout(self.timeout, run).await.is_ok();

        if finished {
            Ok(CommandResult::Completed(output))
        } else {
            warn!("[command] `{}` timed out after {:?}", command, self.timeout);
            let _ = child.kill().await;
            Ok(CommandResult::TimedOut)
        }
    }
}

impl ShellCommandRunner {
    fn run_blocking(&self, command: &str) -> CommandResult {
        let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                warn!("[command] failed to create runtime: {}", e);
                return CommandResult::LaunchFailed;
            }
        };

        match rt.block_on(self.run_async(command)) {
            Ok(result) => result,
            Err(e) => {
                debug!("[command] {}", e);
                CommandResult::LaunchFailed
            }
        }
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str) -> CommandResult {
        if Handle::try_current().is_err() {
            return self.run_blocking(command);
        }

        // A runtime already drives this thread; blocking on a second one here
        // would panic, so the child gets a thread of its own.
        std::thread::scope(|scope| {
            match scope.spawn(|| self.run_blocking(command)).join() {
                Ok(result) => result,
                Err(_) => {
                    warn!("[command] runner thread for `{}` panicked", command);
                    CommandResult::LaunchFailed
                }
            }
        })
    }
}

/// Canned answers keyed by the exact command string. Unknown commands
/// behave as if they could not be launched.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCommands(HashMap<String, CommandResult>);

impl ScriptedCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output<I, S>(mut self, command: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.insert(
            command.to_string(),
            CommandResult::Completed(CommandOutput::from_lines(lines)),
        );
        self
    }

    pub fn with_result(mut self, command: &str, result: CommandResult) -> Self {
        self.0.insert(command.to_string(), result);
        self
    }
}

impl CommandRunner for ScriptedCommands {
    fn run(&self, command: &str) -> CommandResult {
        self.0
            .get(command)
            .cloned()
            .unwrap_or(CommandResult::LaunchFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn runner(timeout_ms: u64) -> ShellCommandRunner {
        ShellCommandRunner::new("/bin/sh", Duration::from_millis(timeout_ms))
    }

    #[cfg(unix)]
    #[test_log::test]
    fn test_captures_lines_in_order() {
        let result = runner(5_000).run("printf 'first\\nsecond\\r\\nthird'");
        assert_matches!(result, CommandResult::Completed(ref out) if out.len() == 3);
        let output = result.into_output();
        assert_eq!(output.line(0), Some("first"));
        // only the newline is stripped
        assert_eq!(output.line(1), Some("second\r"));
        assert_eq!(output.line(2), Some("third"));
    }

    #[cfg(unix)]
    #[test_log::test]
    fn test_keeps_lines_after_invalid_utf8() {
        let output = runner(5_000).run("printf '\\377\\nsu\\n'").into_output();
        assert_eq!(output.len(), 2);
        assert_eq!(output.line(0), Some("\u{FFFD}"));
        assert_eq!(output.line(1), Some("su"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_inside_async_runtime() {
        let output = runner(5_000).run("echo hi").into_output();
        assert_eq!(output.line(0), Some("hi"));
    }

    #[cfg(unix)]
    #[test_log::test]
    fn test_silent_command_is_empty() {
        let result = runner(5_000).run("command_that_does_not_exist_xyz 2>/dev/null");
        assert_matches!(result, CommandResult::Completed(ref out) if out.is_empty());
    }

    #[test_log::test]
    fn test_unlaunchable_shell_yields_empty_output() {
        let result = ShellCommandRunner::new("/nonexistent/shell", Duration::from_secs(1)).run("which su");
        assert_eq!(result, CommandResult::LaunchFailed);
        assert_eq!(result.into_output().len(), 0);
    }

    #[cfg(unix)]
    #[test_log::test]
    fn test_hanging_command_times_out() {
        let result = runner(200).run("sleep 10");
        assert_eq!(result, CommandResult::TimedOut);
        assert!(result.into_output().is_empty());
    }

    #[test]
    fn test_scripted_unknown_command_fails_to_launch() {
        let commands = ScriptedCommands::new().with_output("which su", ["/system/bin/su"]);
        assert_eq!(commands.run("which su").into_output().line(0), Some("/system/bin/su"));
        assert_eq!(commands.run("magisk --list"), CommandResult::LaunchFailed);
    }
}
