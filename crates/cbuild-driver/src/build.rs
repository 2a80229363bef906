//! Building a single named target.

use cbuild_config::TargetSet;
use tracing::{debug, info, warn};

use crate::resolve::resolve;
use crate::{BuildError, CommandRunner, ExecutionResult, PlatformToolchain, ResolvedCommand};

/// What happened when a target was launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub target: String,
    pub command: ResolvedCommand,
    /// Exit status of the launched command. Not interpreted by the builder.
    pub result: ExecutionResult,
}

/// Looks targets up, resolves them for one toolchain and launches them.
///
/// Each [`Builder::build`] call launches at most one process and blocks
/// until it exits.
pub struct Builder<R> {
    toolchain: PlatformToolchain,
    runner: R,
}

impl<R: CommandRunner> Builder<R> {
    pub fn new(toolchain: PlatformToolchain, runner: R) -> Self {
        Self { toolchain, runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Look up `name` and resolve it without launching anything.
    pub fn resolve(&self, targets: &TargetSet, name: &str) -> Result<ResolvedCommand, BuildError> {
        let target = targets.find(name).ok_or_else(|| BuildError::TargetNotFound {
            name: name.to_string(),
        })?;

        resolve(target, &self.toolchain).map_err(|source| BuildError::Resolve {
            target: name.to_string(),
            source,
        })
    }

    /// Look up, resolve and launch the target called `name`.
    ///
    /// Succeeds once the command has been launched, whatever its exit code.
    pub fn build(&mut self, targets: &TargetSet, name: &str) -> Result<BuildReport, BuildError> {
        let command = self.resolve(targets, name)?;
        info!(target_name = name, %command, "running command");

        let result = self.runner.run(&command).map_err(|source| {
            warn!(target_name = name, error = %source, "launch failed");
            BuildError::Launch {
                target: name.to_string(),
                command: command.to_string(),
                source,
            }
        })?;
        debug!(target_name = name, code = ?result.code, "command finished");

        Ok(BuildReport {
            target: name.to_string(),
            command,
            result,
        })
    }
}

/// Build `name` from `targets` with a one-off [`Builder`].
pub fn build_target<R: CommandRunner>(
    targets: &TargetSet,
    name: &str,
    toolchain: PlatformToolchain,
    runner: R,
) -> Result<BuildReport, BuildError> {
    Builder::new(toolchain, runner).build(targets, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolveError;
    use cbuild_config::Target;
    use std::io;

    #[derive(Default)]
    struct Recorder {
        launched: Vec<String>,
        fail_launch: bool,
    }

    impl CommandRunner for Recorder {
        fn run(&mut self, command: &ResolvedCommand) -> io::Result<ExecutionResult> {
            self.launched.push(command.to_string());
            if self.fail_launch {
                Err(io::Error::new(io::ErrorKind::NotFound, "no such program"))
            } else {
                Ok(ExecutionResult::exited(0))
            }
        }
    }

    fn set() -> TargetSet {
        TargetSet::new(vec![
            Target::source("app", "main.c", "debug"),
            Target::source("bad", "main.c", "turbo"),
            Target::command("docs", "doxygen"),
        ])
    }

    #[test]
    fn test_build_launches_once() {
        let mut builder = Builder::new(PlatformToolchain::PosixGcc, Recorder::default());
        let report = builder.build(&set(), "app").unwrap();

        assert_eq!(report.target, "app");
        assert_eq!(report.command.to_string(), "gcc -g main.c -o app");
        assert!(report.result.success());
        assert_eq!(builder.runner().launched, vec!["gcc -g main.c -o app"]);
    }

    #[test]
    fn test_not_found_launches_nothing() {
        let mut recorder = Recorder::default();
        let err = build_target(&TargetSet::default(), "app", PlatformToolchain::PosixGcc, &mut recorder)
            .unwrap_err();

        assert!(matches!(err, BuildError::TargetNotFound { ref name } if name == "app"));
        assert!(recorder.launched.is_empty());
    }

    #[test]
    fn test_resolve_error_launches_nothing() {
        let mut builder = Builder::new(PlatformToolchain::PosixGcc, Recorder::default());
        let err = builder.build(&set(), "bad").unwrap_err();

        match err {
            BuildError::Resolve { target, source } => {
                assert_eq!(target, "bad");
                assert_eq!(
                    source,
                    ResolveError::UnknownBuildMode {
                        mode: "turbo".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(builder.into_runner().launched.is_empty());
    }

    #[test]
    fn test_launch_failure() {
        let recorder = Recorder {
            fail_launch: true,
            ..Recorder::default()
        };
        let mut builder = Builder::new(PlatformToolchain::PosixGcc, recorder);
        let err = builder.build(&set(), "docs").unwrap_err();

        assert!(matches!(err, BuildError::Launch { ref command, .. } if command == "doxygen"));
        assert_eq!(err.target(), "docs");
        assert_eq!(builder.runner().launched.len(), 1);
    }

    #[test]
    fn test_nonzero_exit_is_still_a_build() {
        struct Failing;
        impl CommandRunner for Failing {
            fn run(&mut self, _: &ResolvedCommand) -> io::Result<ExecutionResult> {
                Ok(ExecutionResult::exited(1))
            }
        }

        let report = build_target(&set(), "app", PlatformToolchain::PosixGcc, Failing).unwrap();
        assert_eq!(report.result.code, Some(1));
    }

    #[test]
    fn test_resolve_only() {
        let builder = Builder::new(PlatformToolchain::WindowsMsvc, Recorder::default());
        let command = builder.resolve(&set(), "app").unwrap();

        assert_eq!(command.to_string(), "cl /EHsc /Fe:app main.c");
        assert!(builder.runner().launched.is_empty());
    }
}
