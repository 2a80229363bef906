//! Error types for target resolution and builds.

use miette::Diagnostic;
use thiserror::Error;

/// Why a target could not be turned into a command.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown build mode: {mode}")]
    #[diagnostic(
        code(cbuild::unknown_build_mode),
        help("use one of: debug, release, testing")
    )]
    UnknownBuildMode { mode: String },

    #[error("unsupported platform: {platform}")]
    #[diagnostic(
        code(cbuild::unsupported_platform),
        help("pass --toolchain with one of: posix-gcc, msvc, mingw")
    )]
    UnsupportedPlatform { platform: String },

    /// The extension is taken from the file name component with
    /// [`std::path::Path::extension`], so `.hidden`, `main.` and `src.d/main`
    /// all count as having none.
    #[error("source file has no extension: {source_file}")]
    #[diagnostic(
        code(cbuild::missing_extension),
        help("name the file with a .c, .cpp or .cc extension")
    )]
    MissingExtension { source_file: String },
}

/// Failure of a single build request.
#[derive(Error, Diagnostic, Debug)]
pub enum BuildError {
    #[error("target not found: {name}")]
    #[diagnostic(code(cbuild::target_not_found), help("run `cbuild list` to see the configured targets"))]
    TargetNotFound { name: String },

    #[error("cannot resolve target '{target}'")]
    #[diagnostic(code(cbuild::resolve))]
    Resolve {
        target: String,
        #[source]
        #[diagnostic_source]
        source: ResolveError,
    },

    #[error("failed to launch `{command}` for target '{target}'")]
    #[diagnostic(code(cbuild::launch_failure))]
    Launch {
        target: String,
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Name of the target the error is about.
    pub fn target(&self) -> &str {
        match self {
            BuildError::TargetNotFound { name } => name,
            BuildError::Resolve { target, .. } | BuildError::Launch { target, .. } => target,
        }
    }
}
