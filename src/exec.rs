//! Synchronous external command execution.
//!
//! The orchestrator and the header assembler never touch `std::process`
//! directly; they go through an [`Executor`] so tests can substitute a fake.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Copy of this command with `path` appended as the final argument.
    pub fn with_path(&self, path: &Path) -> Self {
        self.clone().arg(path.to_string_lossy())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit status plus whatever was captured from stdout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
}

impl CommandOutput {
    /// `exit code N`, or a note that the process was killed without one.
    pub fn exit_description(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

pub trait Executor {
    /// Run with inherited stdio, blocking until the process exits.
    fn status(&self, cmd: &CommandSpec) -> io::Result<CommandOutput>;

    /// Run capturing stdout; stderr stays attached to the terminal.
    fn output(&self, cmd: &CommandSpec) -> io::Result<CommandOutput>;
}

/// Executor backed by real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn command(cmd: &CommandSpec) -> Command {
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        command
    }
}

impl Executor for SystemExecutor {
    fn status(&self, cmd: &CommandSpec) -> io::Result<CommandOutput> {
        let status = Self::command(cmd).status()?;
        Ok(CommandOutput {
            success: status.success(),
            code: status.code(),
            stdout: Vec::new(),
        })
    }

    fn output(&self, cmd: &CommandSpec) -> io::Result<CommandOutput> {
        let output = Self::command(cmd)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
        })
    }
}
