//! compile_commands.json entries.
//!
//! Editors and clang tooling read a compile_commands.json file that lists
//! the exact compilation command for each source file. cbuild writes one
//! for the source-based targets of a config, always in the `arguments`
//! form so paths with spaces survive without quoting. [`CompileCommands::from_file`]
//! reads such a file back, which is how a written database is verified.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// A single compile command from compile_commands.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    /// The working directory for compilation.
    pub directory: PathBuf,

    /// The source file path.
    pub file: PathBuf,

    /// Program followed by its arguments.
    pub arguments: Vec<String>,

    /// Output file (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl CompileCommand {
    pub fn from_arguments(
        directory: impl Into<PathBuf>,
        file: impl Into<PathBuf>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            file: file.into(),
            arguments,
            output: None,
        }
    }

    /// Set the output file.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Collection of compile commands (a compile_commands.json document).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileCommands {
    commands: Vec<CompileCommand>,
}

impl CompileCommands {
    pub fn new(commands: Vec<CompileCommand>) -> Self {
        Self { commands }
    }

    /// Load a document previously written by [`CompileCommands::write_to_file`].
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse compile commands from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> crate::Result<Self> {
        let commands: Vec<CompileCommand> = serde_json::from_str(json)?;
        Ok(Self { commands })
    }

    /// Get all compile commands.
    pub fn commands(&self) -> &[CompileCommand] {
        &self.commands
    }

    pub fn push(&mut self, command: CompileCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Serialize as a pretty-printed JSON array.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&self.commands)?)
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn write_to_file(&self, path: &Path) -> crate::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json + "\n").map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
