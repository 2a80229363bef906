use cbuild_config::TargetSet;
use cbuild_driver::{Builder, CommandRunner, DryRunner, PlatformToolchain, ProcessRunner};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::{Component, Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cbuild")]
#[command(author, version, about = "A minimal launcher for C and C++ build targets")]
struct Cli {
    /// Target configuration file (.json or .toml)
    #[arg(short, long, global = true, default_value = "cbuild.json")]
    config: PathBuf,

    /// Toolchain to resolve commands for: posix-gcc, msvc or mingw (default: host)
    #[arg(short, long, global = true)]
    toolchain: Option<PlatformToolchain>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one or more targets, in order
    Build {
        /// Target names
        #[arg(required = true)]
        targets: Vec<String>,

        /// Print the resolved commands without running them
        #[arg(long)]
        dry_run: bool,

        /// Count a non-zero compiler exit status as a failed build
        #[arg(long)]
        strict: bool,
    },

    /// Print the resolved command for a target
    Print {
        /// Target name
        target: String,
    },

    /// List the configured targets
    List,

    /// Write compile_commands.json for the source-based targets
    Compdb {
        /// Output file path (default: next to the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let toolchain = cli.toolchain.clone().unwrap_or_else(PlatformToolchain::host);
    let targets = load_targets(&cli.config);
    let project_root = project_root(&cli.config);

    match cli.command {
        Commands::Build {
            targets: names,
            dry_run,
            strict,
        } => {
            let failures = if dry_run {
                build_all(&mut Builder::new(toolchain, DryRunner), &targets, &names, strict, true)
            } else {
                let runner = ProcessRunner::new().current_dir(&project_root);
                build_all(&mut Builder::new(toolchain, runner), &targets, &names, strict, false)
            };

            if failures > 0 {
                return Err(miette::miette!(
                    "{} of {} target(s) failed",
                    failures,
                    names.len()
                ));
            }
        }

        Commands::Print { target } => {
            let command = Builder::new(toolchain, DryRunner).resolve(&targets, &target)?;
            println!("{}", command);
        }

        Commands::List => {
            for target in &targets {
                println!("{}\t{}", target.name, target.kind_label());
            }
        }

        Commands::Compdb { output } => {
            let output = output.unwrap_or_else(|| project_root.join("compile_commands.json"));
            let cwd = std::env::current_dir().into_diagnostic()?;
            let directory = compdb_directory(&cwd, &project_root);
            let db = cbuild_driver::compile_commands(&targets, &toolchain, &directory);

            db.write_to_file(&output).into_diagnostic()?;
            println!("Wrote {} entries to {}", db.len(), output.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Load the config; a missing or malformed file yields an empty set.
fn load_targets(config: &Path) -> TargetSet {
    let targets = cbuild_config::load_or_empty(config);
    for name in targets.duplicate_names() {
        warn!(target_name = name, "duplicate target name, the first definition is used");
    }
    targets
}

/// Directory commands run in: the one holding the config file.
fn project_root(config: &Path) -> PathBuf {
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Absolute directory recorded in compile_commands.json, without `.` segments.
fn compdb_directory(cwd: &Path, project_root: &Path) -> PathBuf {
    project_root
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .fold(cwd.to_path_buf(), |dir, component| dir.join(component))
}

/// Build each name in turn and return how many failed.
fn build_all<R: CommandRunner>(
    builder: &mut Builder<R>,
    targets: &TargetSet,
    names: &[String],
    strict: bool,
    dry_run: bool,
) -> usize {
    let mut failures = 0;

    for name in names {
        match builder.build(targets, name) {
            Ok(report) if dry_run => println!("{}: {}", name, report.command),
            Ok(report) => match report.result.code {
                Some(0) => println!("Built {}", name),
                code => {
                    let status = code.map_or_else(|| "a signal".to_string(), |c| c.to_string());
                    eprintln!("{}: `{}` exited with {}", name, report.command, status);
                    if strict {
                        failures += 1;
                    }
                }
            },
            Err(err) => {
                eprintln!("{}: build failed", err.target());
                eprintln!("{:?}", miette::Report::new(err));
                failures += 1;
            }
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_root_defaults_to_current_dir() {
        assert_eq!(project_root(Path::new("cbuild.json")), PathBuf::from("."));
        assert_eq!(project_root(Path::new("sub/cbuild.json")), PathBuf::from("sub"));
    }

    #[cfg(unix)]
    #[test]
    fn test_compdb_directory_drops_cur_dir() {
        let cwd = Path::new("/work");

        let dir = compdb_directory(cwd, Path::new("."));
        assert_eq!(dir.to_str(), Some("/work"));

        let dir = compdb_directory(cwd, Path::new("./sub"));
        assert_eq!(dir.to_str(), Some("/work/sub"));

        let dir = compdb_directory(cwd, Path::new("/abs/proj"));
        assert_eq!(dir.to_str(), Some("/abs/proj"));
    }
}
