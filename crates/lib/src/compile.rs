//! The compile pipeline: single files and whole directory trees.
//!
//! A single file goes stage -> build -> resolve name -> relocate. A tree
//! walk re-runs that pipeline for every regular file, one at a time,
//! mirroring the source tree's relative layout into the output directory.
//! Tree compilation is best-effort: a file that fails is recorded and the
//! walk moves on, so partial success is normal.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::build::{BuildError, build};
use crate::naming::{NamingError, resolve_name};
use crate::relocate::{RelocateError, relocate};
use crate::stage::{StageError, stage};

/// How to compile and where to put the result.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
  /// Directory the artifact lands in.
  pub out_dir: PathBuf,
  /// Explicit artifact name; `None` lets the naming resolver decide.
  pub name: Option<String>,
  /// Leave the temporary workspace behind for debugging.
  pub keep_workspace: bool,
}

/// Errors from one run of the single-file pipeline, tagged by stage.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("staging failed: {0}")]
  Stage(#[from] StageError),

  #[error("build failed: {0}")]
  Build(#[from] BuildError),

  #[error("naming failed: {0}")]
  Naming(#[from] NamingError),

  #[error("relocation failed: {0}")]
  Relocate(#[from] RelocateError),
}

/// A successfully compiled source file.
#[derive(Debug)]
pub struct CompiledFile {
  /// The source that was compiled.
  pub source: PathBuf,
  /// Where the executable actually ended up. Normally the relocated
  /// destination; the preserved workspace path if the move failed.
  pub artifact: PathBuf,
}

/// Per-file outcome of a tree compilation.
#[derive(Debug)]
pub struct FailedFile {
  pub source: PathBuf,
  pub error: CompileError,
}

/// Aggregate outcome of a tree compilation.
#[derive(Debug, Default)]
pub struct TreeReport {
  pub compiled: Vec<CompiledFile>,
  pub failed: Vec<FailedFile>,
}

impl TreeReport {
  /// Number of regular files the walk attempted.
  pub fn attempted(&self) -> usize {
    self.compiled.len() + self.failed.len()
  }

  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }
}

/// Compile one source file end to end.
///
/// Stages a fresh workspace, invokes the compiler, resolves the artifact
/// name (explicit override, self-report, or content hash) and relocates
/// the binary into `options.out_dir`. The workspace is removed when this
/// function returns, on success and failure alike, unless
/// `options.keep_workspace` is set or the binary could not be moved out
/// and the workspace holds the only copy.
pub async fn compile_file(path: &Path, options: &CompileOptions) -> Result<CompiledFile, CompileError> {
  let mut workspace = stage(path, options.keep_workspace)?;
  let binary = build(&workspace).await?;
  let name = resolve_name(&binary, options.name.as_deref()).await?;
  let relocation = relocate(&binary, &options.out_dir, &name)?;

  let artifact = if relocation.moved {
    relocation.path
  } else {
    // The workspace copy is the only one; keep it alive.
    workspace.persist();
    warn!(artifact = %binary.display(), "move failed, the executable stays at its workspace path");
    binary
  };

  info!(source = %path.display(), artifact = %artifact.display(), "compiled");
  Ok(CompiledFile {
    source: path.to_path_buf(),
    artifact,
  })
}

/// Output directory for one walked file: `out_dir` joined with the file's
/// directory relative to `root`, so the source tree's shape carries over.
fn mirrored_out_dir(out_dir: &Path, root: &Path, file: &Path) -> PathBuf {
  let relative = file.strip_prefix(root).unwrap_or(file);
  match relative.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => out_dir.join(parent),
    _ => out_dir.to_path_buf(),
  }
}

/// Compile every regular file under `root`, strictly sequentially.
///
/// Each file's output subdirectory is `options.out_dir` joined with the
/// file's directory relative to `root`, so the source tree's shape is
/// preserved. The explicit name is always forced empty here: two files in
/// one directory would otherwise fight over a single name. Failures never
/// abort the walk.
pub async fn compile_tree(root: &Path, options: &CompileOptions) -> TreeReport {
  let mut report = TreeReport::default();

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
    let file_options = CompileOptions {
      out_dir: mirrored_out_dir(&options.out_dir, root, path),
      name: None,
      keep_workspace: options.keep_workspace,
    };

    match compile_file(path, &file_options).await {
      Ok(compiled) => report.compiled.push(compiled),
      Err(e) => {
        error!(source = %path.display(), error = %e, "compilation failed, continuing");
        report.failed.push(FailedFile {
          source: path.to_path_buf(),
          error: e,
        });
      }
    }
  }

  report
}
