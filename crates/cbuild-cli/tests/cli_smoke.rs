//! CLI smoke tests for cbuild.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "targets": [
        { "name": "app", "source_file": "main.c", "build_mode": "debug" },
        { "name": "fast", "source_file": "main.cpp", "build_mode": "release" },
        { "name": "odd", "source_file": "main.c", "build_mode": "profile" },
        { "name": "stamp", "command": "touch stamp.txt" }
    ]
}"#;

fn cbuild() -> Command {
    cargo_bin_cmd!("cbuild")
}

/// Temp directory holding `cbuild.json`.
fn project(content: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("cbuild.json"), content).unwrap();
    temp
}

fn config_arg(temp: &TempDir) -> String {
    temp.path().join("cbuild.json").display().to_string()
}

#[test]
fn help_flag_works() {
    cbuild()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn dry_run_prints_resolved_commands() {
    let temp = project(CONFIG);

    cbuild()
        .args(["build", "app", "fast", "--dry-run", "--toolchain", "posix-gcc"])
        .args(["--config", &config_arg(&temp)])
        .assert()
        .success()
        .stdout(predicate::str::contains("app: gcc -g main.c -o app"))
        .stdout(predicate::str::contains("fast: g++ -O2 main.cpp -o fast"));
}

#[test]
fn print_uses_toolchain_override() {
    let temp = project(CONFIG);

    cbuild()
        .args(["print", "fast", "-t", "msvc", "-c", &config_arg(&temp)])
        .assert()
        .success()
        .stdout("cl /EHsc /Fe:fast.exe main.cpp\n");
}

#[test]
fn unknown_toolchain_is_rejected() {
    cbuild()
        .args(["print", "app", "--toolchain", "borland"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown toolchain"));
}

#[test]
fn missing_target_fails() {
    let temp = project(CONFIG);

    cbuild()
        .args(["build", "nope", "--dry-run", "-c", &config_arg(&temp)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target not found: nope"));
}

#[test]
fn unknown_mode_fails_on_posix_gcc() {
    let temp = project(CONFIG);

    cbuild()
        .args(["build", "odd", "--dry-run", "-t", "posix-gcc", "-c", &config_arg(&temp)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown build mode: profile"));
}

#[test]
fn missing_config_means_no_targets() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("absent.json");

    cbuild()
        .args(["build", "app", "--dry-run", "-c", &config.display().to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target not found: app"));
}

#[test]
fn list_shows_targets_in_order() {
    let temp = project(CONFIG);

    cbuild()
        .args(["list", "-c", &config_arg(&temp)])
        .assert()
        .success()
        .stdout("app\tsource\nfast\tsource\nodd\tsource\nstamp\tcommand\n");
}

#[test]
#[cfg(unix)]
fn command_target_runs_in_config_dir() {
    let temp = project(CONFIG);

    cbuild()
        .args(["build", "stamp", "-c", &config_arg(&temp)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built stamp"));

    assert!(temp.path().join("stamp.txt").exists());
}

#[test]
#[cfg(unix)]
fn one_failure_fails_the_run_but_others_build() {
    let temp = project(CONFIG);

    cbuild()
        .args(["build", "nope", "stamp", "-c", &config_arg(&temp)])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Built stamp"))
        .stderr(predicate::str::contains("1 of 2 target(s) failed"));

    assert!(temp.path().join("stamp.txt").exists());
}

#[test]
#[cfg(unix)]
fn strict_counts_nonzero_exit() {
    let temp = project(r#"{ "targets": [ { "name": "bad", "command": "exit 2" } ] }"#);

    cbuild()
        .args(["build", "bad", "-c", &config_arg(&temp)])
        .assert()
        .success()
        .stderr(predicate::str::contains("exited with 2"));

    cbuild()
        .args(["build", "bad", "--strict", "-c", &config_arg(&temp)])
        .assert()
        .failure();
}

#[test]
fn compdb_writes_source_targets() {
    let temp = project(CONFIG);

    cbuild()
        .args(["compdb", "-t", "posix-gcc", "-c", &config_arg(&temp)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 entries"));

    let db = cbuild_config::CompileCommands::from_file(&temp.path().join("compile_commands.json"))
        .unwrap();
    assert_eq!(db.len(), 2);
    assert!(db
        .commands()
        .iter()
        .any(|entry| entry.file == std::path::Path::new("main.cpp")));
}

#[test]
fn compdb_directory_has_no_dot_segment() {
    let temp = project(CONFIG);

    cbuild()
        .current_dir(temp.path())
        .args(["compdb", "-t", "posix-gcc"])
        .assert()
        .success();

    let db = cbuild_config::CompileCommands::from_file(&temp.path().join("compile_commands.json"))
        .unwrap();
    for entry in db.commands() {
        let directory = entry.directory.to_string_lossy();
        assert!(entry.directory.is_absolute());
        assert!(!directory.ends_with('.'), "directory {:?}", directory);
    }
}
