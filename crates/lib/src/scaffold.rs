//! Scaffolding for new logic units.
//!
//! This module backs the `effe new` command: it writes the built-in logic
//! template to the requested path so the user can start from a unit that
//! already follows the `Init`/`Start`/`Run`/`Stop` convention and carries
//! a well-formed `Info` self-report.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::templates;
use crate::util::write_new;

/// Errors that can occur while scaffolding a new logic unit.
#[derive(Debug, Error)]
pub enum ScaffoldError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

/// Create a new logic unit at `path` from the built-in template.
///
/// # Errors
///
/// Returns an error if a file already exists at `path` or the write fails.
pub fn create_unit(path: &Path) -> Result<PathBuf, ScaffoldError> {
  write_new(path, templates::LOGIC).map_err(|e| {
    if e.kind() == std::io::ErrorKind::AlreadyExists {
      ScaffoldError::PathExists { path: path.to_path_buf() }
    } else {
      ScaffoldError::WriteFile {
        path: path.to_path_buf(),
        source: e,
      }
    }
  })?;

  info!(path = %path.display(), "scaffolded new logic unit");
  Ok(path.to_path_buf())
}
