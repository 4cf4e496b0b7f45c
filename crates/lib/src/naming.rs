//! Name resolution for compiled artifacts and image tags.
//!
//! Compiled units are not required to implement the self-report
//! convention, so naming is an ordered fallback chain that always lands on
//! something deterministic:
//!
//! 1. an explicit name from the caller, verbatim;
//! 2. `<name>_v<version>` from the artifact's self-report;
//! 3. the decimal FNV-1a 64 hash of the artifact's bytes.
//!
//! Only a hash I/O failure can make resolution fail. Image tags follow the
//! same chain with `name:version` in place of the file-name form and the
//! artifact's base file name as the final resort.

use std::fs::File;
use std::hash::Hasher;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use fnv::FnvHasher;
use thiserror::Error;
use tracing::debug;

use crate::describe::describe;

/// Errors that can occur during name resolution.
#[derive(Debug, Error)]
pub enum NamingError {
  #[error("failed to hash {}: {source}", path.display())]
  Hash { path: PathBuf, source: std::io::Error },
}

/// FNV-1a 64 hash of a file's full content, as a decimal string.
///
/// Identical bytes always produce the identical name; this is the chain's
/// last resort and its only fallible step.
pub fn content_hash(path: &Path) -> Result<String, NamingError> {
  let file = File::open(path).map_err(|e| NamingError::Hash {
    path: path.to_path_buf(),
    source: e,
  })?;
  let mut reader = BufReader::new(file);
  let mut hasher = FnvHasher::default();

  let mut buffer = [0u8; 8192];
  loop {
    let read = reader.read(&mut buffer).map_err(|e| NamingError::Hash {
      path: path.to_path_buf(),
      source: e,
    })?;
    if read == 0 {
      break;
    }
    hasher.write(&buffer[..read]);
  }

  Ok(hasher.finish().to_string())
}

/// File name derived from a self-report: `<name>_v<version>`.
///
/// The version may be empty, yielding a trailing `_v`.
pub fn executable_name(name: &str, version: &str) -> String {
  format!("{name}_v{version}")
}

/// Resolve the final file name for a compiled artifact.
///
/// An explicit caller-supplied name short-circuits everything, with no
/// version suffix appended. Otherwise the self-report is consulted, and a
/// missing or unusable report falls through to the content hash.
///
/// # Errors
///
/// Only `NamingError::Hash`, when the last-resort hash cannot be computed.
pub async fn resolve_name(binary: &Path, explicit: Option<&str>) -> Result<String, NamingError> {
  if let Some(name) = explicit {
    return Ok(name.to_string());
  }

  match describe(binary).await {
    Ok(report) if !report.name.is_empty() => Ok(executable_name(&report.name, &report.version)),
    Ok(_) => {
      debug!(binary = %binary.display(), "self-report has no name, falling back to hash");
      content_hash(binary)
    }
    Err(e) => {
      debug!(binary = %binary.display(), error = %e, "no self-report, falling back to hash");
      content_hash(binary)
    }
  }
}

/// Derive a container image tag for an artifact.
///
/// `name:version` when the self-report carries both; the content hash when
/// there is no usable report; the artifact's base file name when the
/// report names the unit but omits a version, or when even hashing fails.
/// Total: always yields some tag.
pub async fn image_tag(binary: &Path) -> String {
  let base_name = || {
    binary
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default()
  };

  match describe(binary).await {
    Ok(report) if !report.name.is_empty() && !report.version.is_empty() => {
      format!("{}:{}", report.name, report.version)
    }
    Ok(report) if !report.name.is_empty() => base_name(),
    _ => match content_hash(binary) {
      Ok(hash) => hash,
      Err(e) => {
        debug!(binary = %binary.display(), error = %e, "hash failed, tagging with file name");
        base_name()
      }
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn file_with(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
  }

  #[test]
  fn content_hash_matches_known_vectors() {
    let temp = TempDir::new().unwrap();

    let empty = file_with(&temp, "empty", b"");
    assert_eq!(content_hash(&empty).unwrap(), "14695981039346656037");

    let single = file_with(&temp, "single", b"a");
    assert_eq!(content_hash(&single).unwrap(), "12638187200555641996");

    let hello = file_with(&temp, "hello", b"hello world");
    assert_eq!(content_hash(&hello).unwrap(), "8618312879776256743");
  }

  #[test]
  fn content_hash_is_deterministic_and_content_sensitive() {
    let temp = TempDir::new().unwrap();
    let a = file_with(&temp, "a", b"some binary content");
    let b = file_with(&temp, "b", b"some binary content");
    let c = file_with(&temp, "c", b"some binary contenu");

    assert_eq!(content_hash(&a).unwrap(), content_hash(&a).unwrap());
    assert_eq!(content_hash(&a).unwrap(), content_hash(&b).unwrap());
    assert_ne!(content_hash(&a).unwrap(), content_hash(&c).unwrap());
  }

  #[test]
  fn content_hash_of_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let err = content_hash(&temp.path().join("missing")).unwrap_err();
    assert!(matches!(err, NamingError::Hash { .. }));
  }

  #[test]
  fn executable_name_keeps_empty_version_suffix() {
    assert_eq!(executable_name("hello_effe", "0.1"), "hello_effe_v0.1");
    assert_eq!(executable_name("bare", ""), "bare_v");
  }

  #[tokio::test]
  async fn explicit_name_wins_unconditionally() {
    let temp = TempDir::new().unwrap();
    // Not even a real file: the explicit path never touches the binary.
    let binary = temp.path().join("whatever");

    let name = resolve_name(&binary, Some("picked-by-hand")).await.unwrap();
    assert_eq!(name, "picked-by-hand");
  }

  #[tokio::test]
  async fn unresponsive_binary_falls_back_to_hash() {
    let temp = TempDir::new().unwrap();
    // A plain data file cannot be executed, so describing it fails.
    let binary = file_with(&temp, "opaque", b"not an executable");

    let name = resolve_name(&binary, None).await.unwrap();
    assert_eq!(name, content_hash(&binary).unwrap());
  }

  #[tokio::test]
  async fn resolution_is_deterministic_for_identical_bytes() {
    let temp = TempDir::new().unwrap();
    let binary = file_with(&temp, "opaque", b"fixed bytes");

    let first = resolve_name(&binary, None).await.unwrap();
    let second = resolve_name(&binary, None).await.unwrap();
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn image_tag_without_self_report_is_the_content_hash() {
    let temp = TempDir::new().unwrap();
    let binary = file_with(&temp, "opaque", b"image payload");

    assert_eq!(image_tag(&binary).await, content_hash(&binary).unwrap());
  }

  #[cfg(unix)]
  mod with_fake_artifacts {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_artifact(dir: &TempDir, body: &str) -> PathBuf {
      let path = dir.path().join("artifact");
      std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
      std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
      path
    }

    #[tokio::test]
    async fn self_reported_name_and_version_form_the_file_name() {
      let temp = TempDir::new().unwrap();
      let artifact = fake_artifact(&temp, r#"echo '{"name": "greeter", "version": "1.2"}'"#);

      let name = resolve_name(&artifact, None).await.unwrap();
      assert_eq!(name, "greeter_v1.2");
    }

    #[tokio::test]
    async fn explicit_name_overrides_a_valid_self_report() {
      let temp = TempDir::new().unwrap();
      let artifact = fake_artifact(&temp, r#"echo '{"name": "greeter", "version": "1.2"}'"#);

      let name = resolve_name(&artifact, Some("forced")).await.unwrap();
      assert_eq!(name, "forced");
    }

    #[tokio::test]
    async fn empty_reported_name_falls_back_to_hash() {
      let temp = TempDir::new().unwrap();
      let artifact = fake_artifact(&temp, r#"echo '{"name": "", "version": "9"}'"#);

      let name = resolve_name(&artifact, None).await.unwrap();
      assert_eq!(name, content_hash(&artifact).unwrap());
    }

    #[tokio::test]
    async fn image_tag_joins_name_and_version_with_colon() {
      let temp = TempDir::new().unwrap();
      let artifact = fake_artifact(&temp, r#"echo '{"name": "greeter", "version": "1.2"}'"#);

      assert_eq!(image_tag(&artifact).await, "greeter:1.2");
    }

    #[tokio::test]
    async fn image_tag_with_versionless_report_uses_file_name() {
      let temp = TempDir::new().unwrap();
      let artifact = fake_artifact(&temp, r#"echo '{"name": "greeter", "version": ""}'"#);

      assert_eq!(image_tag(&artifact).await, "artifact");
    }
  }
}
