//! Implementation of the `effe docker` command.
//!
//! Packages one compiled artifact, or a directory of artifacts, into
//! container images. Directory runs mirror the compile walk's best-effort
//! semantics.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use tokio::runtime::Runtime;

use effe_lib::docker::{package, package_tree};

use crate::output::symbols;

/// Execute the docker command.
pub fn cmd_docker(path: &Path, keep_temp: bool) -> Result<()> {
  let metadata =
    fs::symlink_metadata(path).with_context(|| format!("Cannot open {}, does it exist?", path.display()))?;

  let rt = Runtime::new().context("Failed to create async runtime")?;

  if metadata.is_dir() {
    let report = rt.block_on(package_tree(path, keep_temp));

    println!();
    println!("Packaging complete!");
    println!("  Artifacts attempted: {}", report.attempted());
    println!("  Images built:        {}", report.packaged.len());
    println!("  Failed:              {}", report.failed.len());

    for packaged in &report.packaged {
      println!(
        "  {} {} {} {}",
        symbols::SUCCESS.green(),
        packaged.artifact.display(),
        symbols::ARROW,
        packaged.tag.cyan()
      );
    }
    for failed in &report.failed {
      eprintln!(
        "  {} {}: {}",
        symbols::ERROR.red(),
        failed.artifact.display(),
        failed.error
      );
    }

    Ok(())
  } else if metadata.is_file() {
    let tag = rt
      .block_on(package(path, keep_temp))
      .with_context(|| format!("Failed to package {}", path.display()))?;

    println!(
      "{} Built image {}",
      symbols::SUCCESS.green(),
      tag.cyan().bold()
    );
    Ok(())
  } else {
    bail!("{} is neither a regular file nor a directory", path.display());
  }
}
