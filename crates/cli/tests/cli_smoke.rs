//! CLI smoke tests for effe.
//!
//! These tests exercise the command surface without requiring a Go
//! toolchain or a Docker daemon: scaffolding, argument handling, and the
//! best-effort directory semantics that must hold even when every
//! compilation fails.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the effe binary.
fn effe_cmd() -> Command {
  cargo_bin_cmd!("effe")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  effe_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  effe_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("effe"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["new", "compile", "docker"] {
    effe_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

#[test]
fn compile_help_documents_output_flags() {
  effe_cmd()
    .arg("compile")
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("--dirout"))
    .stdout(predicate::str::contains("--out"));
}

// =============================================================================
// new
// =============================================================================

#[test]
fn new_scaffolds_a_logic_unit() {
  let temp = TempDir::new().unwrap();
  let unit = temp.path().join("hello.go");

  effe_cmd().arg("new").arg(&unit).assert().success();

  let content = std::fs::read_to_string(&unit).unwrap();
  assert!(content.contains("package logic"));
  assert!(content.contains("hello_effe"));
  assert!(content.contains("\"version\": \"0.1\""));
}

#[test]
fn new_fails_if_path_exists() {
  let temp = TempDir::new().unwrap();
  let unit = temp.path().join("hello.go");
  std::fs::write(&unit, "precious user code").unwrap();

  effe_cmd()
    .arg("new")
    .arg(&unit)
    .assert()
    .failure()
    .stderr(predicate::str::contains("already exists"));

  assert_eq!(std::fs::read_to_string(&unit).unwrap(), "precious user code");
}

// =============================================================================
// compile
// =============================================================================

#[test]
fn compile_nonexistent_path_fails() {
  let temp = TempDir::new().unwrap();

  effe_cmd()
    .arg("compile")
    .arg(temp.path().join("missing.go"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("does it exist"));
}

#[test]
fn compile_empty_directory_attempts_nothing() {
  let temp = TempDir::new().unwrap();
  let src = temp.path().join("src");
  std::fs::create_dir_all(&src).unwrap();

  effe_cmd()
    .arg("compile")
    .arg(&src)
    .arg("--dirout")
    .arg(temp.path().join("out"))
    .assert()
    .success()
    .stdout(predicate::str::contains("Files attempted: 0"));
}

#[test]
fn compile_directory_keeps_going_past_failures() {
  // Neither file is a compilable unit, so both fail; the walk must still
  // attempt both and the command must still exit zero.
  let temp = TempDir::new().unwrap();
  let src = temp.path().join("src");
  std::fs::create_dir_all(src.join("nested")).unwrap();
  std::fs::write(src.join("broken.go"), "this is not go").unwrap();
  std::fs::write(src.join("nested").join("also_broken.go"), "neither is this").unwrap();

  effe_cmd()
    .arg("compile")
    .arg(&src)
    .arg("--dirout")
    .arg(temp.path().join("out"))
    .assert()
    .success()
    .stdout(predicate::str::contains("Files attempted: 2"));
}

// =============================================================================
// docker
// =============================================================================

#[test]
fn docker_nonexistent_path_fails() {
  let temp = TempDir::new().unwrap();

  effe_cmd()
    .arg("docker")
    .arg(temp.path().join("missing"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("does it exist"));
}

#[test]
fn docker_empty_directory_attempts_nothing() {
  let temp = TempDir::new().unwrap();
  let artifacts = temp.path().join("artifacts");
  std::fs::create_dir_all(&artifacts).unwrap();

  effe_cmd()
    .arg("docker")
    .arg(&artifacts)
    .assert()
    .success()
    .stdout(predicate::str::contains("Artifacts attempted: 0"));
}
