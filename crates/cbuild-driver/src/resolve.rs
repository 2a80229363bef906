//! Resolution of targets into compiler invocations.
//!
//! Resolution is a pure function of the target record and the toolchain:
//! it never touches the filesystem. The decision table is
//!
//! | Toolchain    | C++ (`.cpp`, `.cc`)                 | C (anything else)                   |
//! |--------------|-------------------------------------|-------------------------------------|
//! | `posix-gcc`  | `g++ <mode-flags> <src> -o <name>`  | `gcc <mode-flags> <src> -o <name>`  |
//! | `msvc`       | `cl /EHsc /Fe:<exe> <src>`          | `cl /EHsc /Fe:<exe> <src>`          |
//! | `mingw`      | `g++ <src> -o <name>`               | `gcc <src> -o <name>`               |
//!
//! A target's extra `flags` follow the mode flags (on `msvc`, `/EHsc`) and
//! its `libs` follow the output name (on `msvc`, the source file). With
//! neither set the commands are exactly those above.
//!
//! Mode flags are `-g` (debug), `-O2` (release) and `-g -DTESTING`
//! (testing). Only `posix-gcc` rejects an unknown mode. On `msvc` the
//! executable gets an `.exe` suffix in release mode and no suffix otherwise.
//!
//! Paths are passed as separate arguments, never quoted. The rendered
//! string form is for display and does not escape spaces.

use cbuild_config::{SourceBuild, Target, TargetKind};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::trace;

use crate::{PlatformToolchain, ResolveError};

/// Build mode of a source-based target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    Debug,
    Release,
    Testing,
}

impl BuildMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
            BuildMode::Testing => "testing",
        }
    }

    /// GCC flags selected by this mode.
    pub fn flags(self) -> &'static [&'static str] {
        match self {
            BuildMode::Debug => &["-g"],
            BuildMode::Release => &["-O2"],
            BuildMode::Testing => &["-g", "-DTESTING"],
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildMode::Debug),
            "release" => Ok(BuildMode::Release),
            "testing" => Ok(BuildMode::Testing),
            other => Err(ResolveError::UnknownBuildMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// Language family of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Cpp,
    C,
}

impl SourceKind {
    /// Exact, case-sensitive: only `cpp` and `cc` are C++.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "cpp" | "cc" => SourceKind::Cpp,
            _ => SourceKind::C,
        }
    }

    /// The GCC driver for this language.
    pub fn gcc_driver(self) -> &'static str {
        match self {
            SourceKind::Cpp => "g++",
            SourceKind::C => "gcc",
        }
    }
}

/// Extension of the file-name component, without the dot.
///
/// `None` when there is no dot or nothing follows it.
pub fn source_extension(source_file: &str) -> Option<&str> {
    Path::new(source_file)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}

/// A compiler program with its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CompilerInvocation {
    pub fn new(program: impl Into<String>) -> Self {
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

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for CompilerInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The command a target resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCommand {
    /// Run a compiler directly with an argument vector.
    Compiler(CompilerInvocation),
    /// Hand a command line to the platform shell unchanged.
    Shell(String),
}

impl fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedCommand::Compiler(invocation) => invocation.fmt(f),
            ResolvedCommand::Shell(command) => f.write_str(command),
        }
    }
}

/// Resolve a target into the command that builds it on `toolchain`.
pub fn resolve(
    target: &Target,
    toolchain: &PlatformToolchain,
) -> Result<ResolvedCommand, ResolveError> {
    match &target.kind {
        TargetKind::Command { command } => Ok(ResolvedCommand::Shell(command.clone())),
        TargetKind::Source(source) => {
            resolve_source(&target.name, source, toolchain).map(ResolvedCommand::Compiler)
        }
    }
}

/// Resolve a source-based target into a compiler invocation.
pub fn resolve_source(
    name: &str,
    source: &SourceBuild,
    toolchain: &PlatformToolchain,
) -> Result<CompilerInvocation, ResolveError> {
    let SourceBuild {
        source_file,
        build_mode,
        flags,
        libs,
    } = source;

    let invocation = match toolchain {
        PlatformToolchain::Unsupported(platform) => {
            return Err(ResolveError::UnsupportedPlatform {
                platform: platform.clone(),
            })
        }
        PlatformToolchain::PosixGcc => {
            let kind = classify(source_file, toolchain)?;
            let mode: BuildMode = build_mode.parse()?;
            CompilerInvocation::new(kind.gcc_driver())
                .args(mode.flags().iter().copied())
                .args(flags)
                .arg(source_file)
                .arg("-o")
                .arg(name)
                .args(libs)
        }
        // cl picks the language from the extension itself.
        PlatformToolchain::WindowsMsvc => {
            classify(source_file, toolchain)?;
            CompilerInvocation::new("cl")
                .arg("/EHsc")
                .args(flags)
                .arg(format!("/Fe:{}", msvc_executable_name(name, build_mode)))
                .arg(source_file)
                .args(libs)
        }
        PlatformToolchain::WindowsMingw => {
            let kind = classify(source_file, toolchain)?;
            CompilerInvocation::new(kind.gcc_driver())
                .args(flags)
                .arg(source_file)
                .arg("-o")
                .arg(name)
                .args(libs)
        }
    };

    Ok(invocation)
}

fn classify(source_file: &str, toolchain: &PlatformToolchain) -> Result<SourceKind, ResolveError> {
    let ext = source_extension(source_file).ok_or_else(|| ResolveError::MissingExtension {
        source_file: source_file.to_string(),
    })?;
    let kind = SourceKind::from_extension(ext);
    trace!(source_file, ?kind, %toolchain, "classified source");
    Ok(kind)
}

/// Output name passed to `cl /Fe:`. Unknown modes are not rejected.
pub fn msvc_executable_name(name: &str, build_mode: &str) -> String {
    if build_mode == BuildMode::Release.as_str() {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}
