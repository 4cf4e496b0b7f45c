//! Compiler invocation for a staged workspace.
//!
//! Runs the external Go toolchain against the generated host program with
//! a forced full rebuild, standalone executable output, and cgo disabled.
//! Compiler diagnostics are streamed straight through to the user's
//! stdout/stderr. The module search path is passed as a per-invocation
//! environment override, so parallel builds in one process never step on
//! each other.

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::stage::Workspace;

#[cfg(unix)]
const PATH_LIST_SEP: &str = ":";
#[cfg(windows)]
const PATH_LIST_SEP: &str = ";";

/// Errors that can occur while invoking the compiler.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("failed to start the go compiler: {source}")]
  Spawn { source: std::io::Error },

  #[error("compilation failed with exit code {code:?}")]
  Exit { code: Option<i32> },
}

/// Module search path for one invocation: the workspace root prepended to
/// whatever GOPATH the process inherited.
fn search_path(workspace: &Workspace) -> OsString {
  let mut gopath = OsString::from(workspace.root());
  if let Some(existing) = std::env::var_os("GOPATH") {
    if !existing.is_empty() {
      gopath.push(PATH_LIST_SEP);
      gopath.push(existing);
    }
  }
  gopath
}

/// Compile the staged host program, returning the path of the produced
/// binary (`<root>/out`).
///
/// The subprocess inherits stdout/stderr so compilation errors stay
/// visible, unmodified. Blocking: awaited to completion with no timeout.
///
/// # Errors
///
/// `BuildError::Spawn` if the compiler cannot be started, `BuildError::Exit`
/// if it exits non-zero.
pub async fn build(workspace: &Workspace) -> Result<PathBuf, BuildError> {
  run_compiler("go", workspace).await
}

async fn run_compiler(program: &str, workspace: &Workspace) -> Result<PathBuf, BuildError> {
  let artifact = workspace.artifact_path();
  let gopath = search_path(workspace);

  info!(source = %workspace.logic_path().display(), "compiling");
  debug!(gopath = ?gopath, artifact = %artifact.display(), "invoking compiler");

  let status = Command::new(program)
    .arg("build")
    .arg("-a")
    .arg("-buildmode=exe")
    .arg("-o")
    .arg(&artifact)
    .arg(workspace.host_path())
    .env("GOPATH", gopath)
    .env("CGO_ENABLED", "0")
    .status()
    .await
    .map_err(|e| BuildError::Spawn { source: e })?;

  if !status.success() {
    return Err(BuildError::Exit { code: status.code() });
  }

  Ok(artifact)
}
