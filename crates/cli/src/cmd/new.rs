//! Implementation of the `effe new` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use effe_lib::scaffold::create_unit;

use crate::output::symbols;

/// Execute the new command.
///
/// Scaffolds a logic unit at the given path from the built-in template.
/// Fails if the path is already occupied.
pub fn cmd_new(path: &Path) -> Result<()> {
  let created = create_unit(path).context("Failed to scaffold the new logic unit")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Created new logic unit".green().bold()
  );
  println!();
  println!("  {} {}", symbols::INFO.cyan(), created.display());
  println!();
  println!("{}", "Next steps:".bold());
  println!("  1. Edit {} and fill in Run", created.display().to_string().cyan());
  println!("  2. Run: {}", format!("effe compile {}", created.display()).cyan());

  Ok(())
}
