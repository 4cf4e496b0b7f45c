//! Workspace staging for a single compilation.
//!
//! Each compilation gets an isolated temporary directory tree
//! (`<tmp>/effebuild-<suffix>/src/effe/logic/`) holding a hard link to the
//! user's source and the generated host program. The workspace is a scoped
//! acquisition: it removes itself on drop unless the caller asked to keep
//! it for debugging.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::templates;
use crate::util::{random_suffix, write_new};

/// Name of the compiled binary inside a workspace.
pub const ARTIFACT_NAME: &str = "out";

/// Errors that can occur while staging a workspace.
#[derive(Debug, Error)]
pub enum StageError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to hard-link {} into the workspace: {source}", source_path.display())]
  Link {
    source_path: PathBuf,
    source: std::io::Error,
  },

  #[error("host program file already exists: {}", path.display())]
  HostExists { path: PathBuf },

  #[error("failed to write host program {}: {source}", path.display())]
  WriteHost { path: PathBuf, source: std::io::Error },
}

/// An isolated, uniquely named compilation workspace.
///
/// Owns its directory tree exclusively until the artifact is relocated out
/// or the compilation fails. Dropping the workspace deletes the tree
/// (best-effort) unless `keep` was set.
#[derive(Debug)]
pub struct Workspace {
  root: PathBuf,
  keep: bool,
}

impl Workspace {
  /// Workspace root directory.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Path of the staged logic unit (`src/effe/logic/logic.go`).
  pub fn logic_path(&self) -> PathBuf {
    self.root.join("src").join("effe").join("logic").join("logic.go")
  }

  /// Path of the generated host program (`src/effe/effe.go`).
  pub fn host_path(&self) -> PathBuf {
    self.root.join("src").join("effe").join("effe.go")
  }

  /// Path the compiler writes the binary to (`<root>/out`).
  pub fn artifact_path(&self) -> PathBuf {
    self.root.join(ARTIFACT_NAME)
  }

  /// Disarm the drop cleanup, leaving the directory tree on disk.
  ///
  /// Used when the artifact could not be moved out: the workspace copy is
  /// then the only one, and deleting it would destroy the binary.
  pub fn persist(&mut self) {
    self.keep = true;
  }
}

impl Drop for Workspace {
  fn drop(&mut self) {
    if self.keep {
      debug!(root = %self.root.display(), "keeping workspace");
      return;
    }
    if let Err(e) = fs::remove_dir_all(&self.root) {
      warn!(root = %self.root.display(), error = %e, "failed to remove workspace");
    }
  }
}

/// Stage a workspace for compiling `source_path`.
///
/// Creates the directory tree, hard-links the source at
/// `src/effe/logic/logic.go` (the source is never copied or mutated), and
/// writes the host program template to `src/effe/effe.go`. The host write
/// is create-new-only; a pre-existing file there is an error.
///
/// # Errors
///
/// Returns an error if directory creation, the hard link (e.g.
/// cross-device), or the host template write fails.
pub fn stage(source_path: &Path, keep: bool) -> Result<Workspace, StageError> {
  let root = std::env::temp_dir().join(format!("effebuild-{}", random_suffix()));
  let logic_dir = root.join("src").join("effe").join("logic");

  fs::create_dir_all(&logic_dir).map_err(|e| StageError::CreateDir {
    path: logic_dir.clone(),
    source: e,
  })?;

  let workspace = Workspace { root, keep };

  fs::hard_link(source_path, workspace.logic_path()).map_err(|e| StageError::Link {
    source_path: source_path.to_path_buf(),
    source: e,
  })?;

  let host_path = workspace.host_path();
  write_new(&host_path, templates::HOST).map_err(|e| {
    if e.kind() == std::io::ErrorKind::AlreadyExists {
      StageError::HostExists { path: host_path.clone() }
    } else {
      StageError::WriteHost {
        path: host_path.clone(),
        source: e,
      }
    }
  })?;

  debug!(root = %workspace.root.display(), source = %source_path.display(), "staged workspace");
  Ok(workspace)
}
