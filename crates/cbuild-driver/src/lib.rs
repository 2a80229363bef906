//! Target resolution and compiler invocation for cbuild.
//!
//! The pipeline for one build request is lookup, then resolution, then
//! launch:
//!
//! - [`PlatformToolchain`] names the compiler front end to target
//! - [`resolve()`] turns a target record into a [`ResolvedCommand`]
//! - [`CommandRunner`] launches it ([`ProcessRunner`] for real processes)
//! - [`Builder`] ties the three together for a named target

mod build;
mod compdb;
mod error;
mod platform;
mod resolve;
mod runner;

pub use build::{build_target, BuildReport, Builder};
pub use compdb::compile_commands;
pub use error::{BuildError, ResolveError};
pub use platform::PlatformToolchain;
pub use resolve::{
    msvc_executable_name, resolve, resolve_source, source_extension, BuildMode,
    CompilerInvocation, ResolvedCommand, SourceKind,
};
pub use runner::{CommandRunner, DryRunner, ExecutionResult, ProcessRunner};
