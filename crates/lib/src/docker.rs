//! Container image packaging for compiled artifacts.
//!
//! Stages a minimal image-build context (a fixed Dockerfile plus a hard
//! link to the artifact under the name `exec`), derives a deterministic
//! tag from the artifact itself, and hands the context to `docker build`.
//! The directory counterpart packages every regular file it finds, one at
//! a time, continuing past failures like the compile walk does.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::naming::image_tag;
use crate::templates;
use crate::util::{random_suffix, write_new};

/// Errors that can occur while packaging an artifact into an image.
#[derive(Debug, Error)]
pub enum PackageError {
  #[error("failed to create staging directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write Dockerfile {}: {source}", path.display())]
  Dockerfile { path: PathBuf, source: std::io::Error },

  #[error("failed to hard-link {} into the staging directory: {source}", path.display())]
  Link { path: PathBuf, source: std::io::Error },

  #[error("failed to start docker: {source}")]
  Spawn { source: std::io::Error },

  #[error("docker build failed with exit code {code:?}")]
  Exit { code: Option<i32> },
}

/// A staged image-build context, removed on drop unless kept.
#[derive(Debug)]
struct ImageContext {
  root: PathBuf,
  keep: bool,
}

impl Drop for ImageContext {
  fn drop(&mut self) {
    if self.keep {
      debug!(root = %self.root.display(), "keeping image context");
      return;
    }
    if let Err(e) = fs::remove_dir_all(&self.root) {
      warn!(root = %self.root.display(), error = %e, "failed to remove image context");
    }
  }
}

/// Stage the build context: `<tmp>/effedocker-<suffix>` with a Dockerfile
/// and the artifact hard-linked in as `exec`.
fn stage_context(artifact: &Path, keep: bool) -> Result<ImageContext, PackageError> {
  let root = std::env::temp_dir().join(format!("effedocker-{}", random_suffix()));
  fs::create_dir_all(&root).map_err(|e| PackageError::CreateDir {
    path: root.clone(),
    source: e,
  })?;
  let context = ImageContext { root, keep };

  let dockerfile = context.root.join("Dockerfile");
  write_new(&dockerfile, templates::DOCKERFILE).map_err(|e| PackageError::Dockerfile {
    path: dockerfile.clone(),
    source: e,
  })?;

  fs::hard_link(artifact, context.root.join(templates::IMAGE_ARTIFACT_NAME)).map_err(|e| {
    PackageError::Link {
      path: artifact.to_path_buf(),
      source: e,
    }
  })?;

  debug!(root = %context.root.display(), artifact = %artifact.display(), "staged image context");
  Ok(context)
}

/// Package one compiled artifact into a container image, returning its tag.
///
/// The tag is `name:version` from the artifact's self-report, falling back
/// to the content hash and finally the file name. Docker's output streams
/// straight through to the user.
pub async fn package(artifact: &Path, keep: bool) -> Result<String, PackageError> {
  let context = stage_context(artifact, keep)?;
  let tag = image_tag(artifact).await;

  info!(artifact = %artifact.display(), tag = %tag, "building image");

  let status = Command::new("docker")
    .arg("build")
    .arg("-t")
    .arg(&tag)
    .arg(context.root.as_os_str())
    .status()
    .await
    .map_err(|e| PackageError::Spawn { source: e })?;

  if !status.success() {
    return Err(PackageError::Exit { code: status.code() });
  }

  Ok(tag)
}

/// A successfully packaged artifact.
#[derive(Debug)]
pub struct PackagedFile {
  pub artifact: PathBuf,
  pub tag: String,
}

/// Per-file failure of a tree packaging run.
#[derive(Debug)]
pub struct FailedPackage {
  pub artifact: PathBuf,
  pub error: PackageError,
}

/// Aggregate outcome of packaging a directory of artifacts.
#[derive(Debug, Default)]
pub struct PackageReport {
  pub packaged: Vec<PackagedFile>,
  pub failed: Vec<FailedPackage>,
}

impl PackageReport {
  pub fn attempted(&self) -> usize {
    self.packaged.len() + self.failed.len()
  }

  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }
}

/// Package every regular file under `root`, strictly sequentially.
///
/// Best-effort like [`crate::compile::compile_tree`]: a failing artifact is
/// recorded and the walk continues.
pub async fn package_tree(root: &Path, keep: bool) -> PackageReport {
  let mut report = PackageReport::default();

  for entry in WalkDir::new(root) {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        error!(error = %e, "cannot walk entry, skipping");
        continue;
      }
    };
    if !entry.file_type().is_file() {
      continue;
    }

    let path = entry.path();
    match package(path, keep).await {
      Ok(tag) => report.packaged.push(PackagedFile {
        artifact: path.to_path_buf(),
        tag,
      }),
      Err(e) => {
        error!(artifact = %path.display(), error = %e, "packaging failed, continuing");
        report.failed.push(FailedPackage {
          artifact: path.to_path_buf(),
          error: e,
        });
      }
    }
  }

  report
}
