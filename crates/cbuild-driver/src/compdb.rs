//! Compile database export.

use cbuild_config::{CompileCommand, CompileCommands, TargetKind, TargetSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::resolve::resolve_source;
use crate::PlatformToolchain;

/// Collect a compile_commands.json entry for every source-based target
/// that resolves on `toolchain`.
///
/// Raw command targets have no single source file and are skipped, as are
/// targets that fail to resolve.
pub fn compile_commands(
    targets: &TargetSet,
    toolchain: &PlatformToolchain,
    directory: &Path,
) -> CompileCommands {
    let mut commands = CompileCommands::default();

    for target in targets {
        let TargetKind::Source(source) = &target.kind else {
            debug!(target_name = %target.name, "skipping command target");
            continue;
        };

        match resolve_source(&target.name, source, toolchain) {
            Ok(invocation) => commands.push(
                CompileCommand::from_arguments(directory, &source.source_file, invocation.argv())
                    .with_output(&target.name),
            ),
            Err(err) => warn!(target_name = %target.name, error = %err, "skipping target"),
        }
    }

    commands
}
