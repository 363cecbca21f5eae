#![cfg(unix)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn build(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_build-cli"))
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to run build")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn fake_compiler(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-clang");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_config(dir: &Path, compiler: &Path) -> PathBuf {
    let path = dir.join("build.toml");
    fs::write(
        &path,
        format!(
            "compiler = '{}'\nbinary = \"example\"\nsources = [\"example.cpp\"]\n",
            compiler.display()
        ),
    )
    .unwrap();
    path
}

#[test]
fn missing_default_compiler() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("example.cpp"), "").unwrap();

    let output = build(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(255));
    assert_eq!(
        stdout(&output),
        "Build failed: Could not find C:\\Program Files\\LLVM\\bin\\clang++.exe\n"
    );
    assert!(!dir.path().join("build").exists());
}

#[test]
fn missing_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let compiler = fake_compiler(dir.path(), "touch spawned");
    let config = write_config(dir.path(), &compiler);

    let output = build(dir.path(), &["--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(255));
    assert_eq!(stdout(&output), "Build failed: Could not find example.cpp\n");
    assert!(!dir.path().join("spawned").exists());
}

#[test]
fn successful_build_without_pdb() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("example.cpp"), "").unwrap();
    let compiler = fake_compiler(dir.path(), "exit 0");
    let config = write_config(dir.path(), &compiler);

    let output = build(dir.path(), &["--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        format!(
            "\"{}\" -fcolor-diagnostics -fansi-escape-codes example.cpp -o build/example\n",
            compiler.display()
        )
    );
    assert!(dir.path().join("build").is_dir());
}

#[test]
fn pdb_adds_debug_flag_before_sources() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("example.cpp"), "").unwrap();
    let compiler = fake_compiler(dir.path(), r#"echo "$@" > args.txt"#);
    let config = write_config(dir.path(), &compiler);

    let output = build(dir.path(), &["--pdb", "--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert_eq!(
        args.trim_end(),
        "-fcolor-diagnostics -fansi-escape-codes -g example.cpp -o build/example"
    );
}

#[test]
fn compiler_exit_code_is_propagated() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("example.cpp"), "").unwrap();
    let compiler = fake_compiler(dir.path(), "echo 'example.cpp:1:1: error' >&2\nexit 3");
    let config = write_config(dir.path(), &compiler);

    let output = build(dir.path(), &["--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("example.cpp:1:1: error"));
}

#[test]
fn repeated_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("example.cpp"), "").unwrap();
    let compiler = fake_compiler(dir.path(), "exit 2");
    let config = write_config(dir.path(), &compiler);
    let args = ["--pdb", "--config", config.to_str().unwrap()];

    let first = build(dir.path(), &args);
    let second = build(dir.path(), &args);

    assert_eq!(first.status.code(), Some(2));
    assert_eq!(first.status.code(), second.status.code());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn bad_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("build.toml");
    fs::write(&config, "sources = 5\n").unwrap();

    let output = build(dir.path(), &["--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error parsing config"));
}

#[test]
fn time_prints_phase_table() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("example.cpp"), "").unwrap();
    let compiler = fake_compiler(dir.path(), "exit 0");
    let config = write_config(dir.path(), &compiler);

    let output = build(dir.path(), &["--time", "--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("check paths"));
    assert!(stderr.contains("compile"));
    assert!(stderr.contains("total"));
}
