//! Process execution for resolved commands.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::ResolvedCommand;

/// Outcome of a command that was launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ExecutionResult {
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a resolved command to completion.
///
/// An `Err` means the command could not be launched at all. A launched
/// command that exits non-zero is still `Ok`.
pub trait CommandRunner {
    fn run(&mut self, command: &ResolvedCommand) -> io::Result<ExecutionResult>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, command: &ResolvedCommand) -> io::Result<ExecutionResult> {
        (**self).run(command)
    }
}

/// Runs commands as child processes with inherited stdio, blocking until
/// they exit.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    current_dir: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands from `dir` instead of the current directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn command(&self, resolved: &ResolvedCommand) -> Command {
        let mut cmd = match resolved {
            ResolvedCommand::Compiler(invocation) => {
                let mut cmd = Command::new(&invocation.program);
                cmd.args(&invocation.args);
                cmd
            }
            ResolvedCommand::Shell(line) => shell_command(line),
        };

        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, resolved: &ResolvedCommand) -> io::Result<ExecutionResult> {
        let mut cmd = self.command(resolved);
        debug!(
            program = ?cmd.get_program(),
            args = ?cmd.get_args().collect::<Vec<_>>(),
            current_dir = ?self.current_dir,
            "spawning process"
        );

        let status = cmd.status()?;
        Ok(ExecutionResult {
            code: status.code(),
        })
    }
}

/// Shell invocation for a raw command target.
///
/// cmd.exe parses its own command line, so the line is appended verbatim
/// after `/C` rather than quoted as a single argument.
#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new("cmd");
    cmd.arg("/C").raw_arg(line);
    cmd
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(line);
    cmd
}

/// Launches nothing and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunner;

impl CommandRunner for DryRunner {
    fn run(&mut self, command: &ResolvedCommand) -> io::Result<ExecutionResult> {
        debug!(%command, "dry run, not launching");
        Ok(ExecutionResult::exited(0))
    }
}
