//! Small filesystem helpers shared across the pipeline.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use rand::Rng;

/// Write `content` to `path`, failing if anything already exists there.
///
/// Create-new-only: an occupied path is an error, never an overwrite.
pub fn write_new(path: &Path, content: &str) -> io::Result<()> {
  let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
  file.write_all(content.as_bytes())
}

/// Random numeric suffix for temporary directory names.
///
/// Uniform in `100_000..1_100_000`, unique enough for workspaces within a
/// process run but not cryptographically so.
pub fn random_suffix() -> String {
  rand::thread_rng().gen_range(100_000..1_100_000u32).to_string()
}
