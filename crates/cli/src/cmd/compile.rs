//! Implementation of the `effe compile` command.
//!
//! A regular-file target runs the single-file pipeline and fails loudly.
//! A directory target compiles every file underneath it best-effort: the
//! walk never aborts, and the command reports a summary instead of failing
//! on the first broken unit.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use tokio::runtime::Runtime;
use tracing::info;

use effe_lib::compile::{CompileOptions, compile_file, compile_tree};

use crate::output::symbols;

/// Execute the compile command.
pub fn cmd_compile(path: &Path, out: Option<String>, dirout: PathBuf, keep_temp: bool) -> Result<()> {
  let metadata =
    fs::symlink_metadata(path).with_context(|| format!("Cannot open {}, does it exist?", path.display()))?;

  let rt = Runtime::new().context("Failed to create async runtime")?;

  let options = CompileOptions {
    out_dir: dirout,
    name: out,
    keep_workspace: keep_temp,
  };

  if metadata.is_dir() {
    let report = rt.block_on(compile_tree(path, &options));

    println!();
    println!("Compile complete!");
    println!("  Files attempted: {}", report.attempted());
    println!("  Compiled:        {}", report.compiled.len());
    println!("  Failed:          {}", report.failed.len());

    for compiled in &report.compiled {
      println!(
        "  {} {} {} {}",
        symbols::SUCCESS.green(),
        compiled.source.display(),
        symbols::ARROW,
        compiled.artifact.display()
      );
    }
    for failed in &report.failed {
      eprintln!(
        "  {} {}: {}",
        symbols::ERROR.red(),
        failed.source.display(),
        failed.error
      );
    }

    info!(
      attempted = report.attempted(),
      failed = report.failed.len(),
      "directory compile finished"
    );

    // Best-effort by contract: partial failure does not fail the command.
    Ok(())
  } else if metadata.is_file() {
    let compiled = rt
      .block_on(compile_file(path, &options))
      .with_context(|| format!("Failed to compile {}", path.display()))?;

    println!(
      "{} Compiled {} {} {}",
      symbols::SUCCESS.green(),
      compiled.source.display(),
      symbols::ARROW,
      compiled.artifact.display().to_string().cyan()
    );
    Ok(())
  } else {
    bail!("{} is neither a regular file nor a directory", path.display());
  }
}
