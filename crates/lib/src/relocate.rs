//! Artifact relocation out of the workspace.
//!
//! Moves a compiled binary from its temporary workspace to the
//! caller-requested destination, creating missing parent directories on
//! the way. A rename that fails across filesystems falls back to
//! copy-and-remove; if even that fails the binary stays where it is and
//! the outcome says so, so the caller can keep the workspace alive
//! instead of sweeping the only copy away.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while relocating an artifact.
#[derive(Debug, Error)]
pub enum RelocateError {
  #[error("failed to resolve absolute path for {}: {source}", path.display())]
  Absolutize { path: PathBuf, source: std::io::Error },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },
}

/// Outcome of a relocation attempt.
#[derive(Debug)]
pub struct Relocation {
  /// Absolute destination path the artifact was (or should have been)
  /// moved to.
  pub path: PathBuf,
  /// Whether the artifact actually reached `path`. `false` means it is
  /// still at its original location.
  pub moved: bool,
}

/// Move `artifact` to `dest_dir/name`.
///
/// Missing parents are created; pre-existing directories are not an error.
/// A move that fails even after the copy fallback is non-fatal: it is
/// logged, the artifact stays at its original path, and the outcome
/// carries `moved: false` so the caller can preserve that location.
///
/// # Errors
///
/// Only path resolution and directory creation fail the call.
pub fn relocate(artifact: &Path, dest_dir: &Path, name: &str) -> Result<Relocation, RelocateError> {
  let target = dest_dir.join(name);
  let target = std::path::absolute(&target).map_err(|e| RelocateError::Absolutize {
    path: target.clone(),
    source: e,
  })?;

  if let Some(parent) = target.parent() {
    fs::create_dir_all(parent).map_err(|e| RelocateError::CreateDir {
      path: parent.to_path_buf(),
      source: e,
    })?;
  }

  if let Err(rename_err) = fs::rename(artifact, &target) {
    // Likely a cross-filesystem move; copy preserves permission bits.
    match fs::copy(artifact, &target) {
      Ok(_) => {
        if let Err(e) = fs::remove_file(artifact) {
          warn!(artifact = %artifact.display(), error = %e, "could not remove workspace copy");
        }
      }
      Err(copy_err) => {
        warn!(
          artifact = %artifact.display(),
          target = %target.display(),
          rename_error = %rename_err,
          copy_error = %copy_err,
          "could not move the artifact, it remains at its original path"
        );
        return Ok(Relocation {
          path: target,
          moved: false,
        });
      }
    }
  }

  info!(target = %target.display(), "artifact relocated");
  Ok(Relocation { path: target, moved: true })
}
