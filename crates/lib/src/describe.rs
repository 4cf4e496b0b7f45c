//! Self-description protocol.
//!
//! A compiled artifact invoked with `-info` is expected to print a single
//! JSON object `{"name": ..., "version": ..., "doc": ...}` on stdout and
//! exit zero. Anything else means "no usable self-report"; the naming
//! resolver falls back to a content hash in that case. The call is awaited
//! to completion with no timeout.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Introspection flag the host program understands.
pub const INFO_FLAG: &str = "-info";

/// Metadata an artifact reports about itself.
///
/// Fields default to empty when missing, matching the lenient decoding of
/// the introspection protocol. `doc` is carried for protocol completeness
/// but never consulted by naming.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelfReport {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub version: String,
  #[serde(default)]
  pub doc: String,
}

/// Why an artifact produced no usable self-report.
#[derive(Debug, Error)]
pub enum DescribeError {
  #[error("failed to run the artifact: {source}")]
  Spawn { source: std::io::Error },

  #[error("artifact exited with code {code:?} during introspection")]
  Exit { code: Option<i32> },

  #[error("invalid self-report JSON: {source}")]
  Decode { source: serde_json::Error },
}

/// Run `binary` with the introspection flag and decode its self-report.
///
/// Only stdout is captured; stderr is discarded. Every failure mode is
/// routine for the caller (it triggers the naming fallback), but the
/// variants stay distinguishable for logging and tests.
pub async fn describe(binary: &Path) -> Result<SelfReport, DescribeError> {
  let output = Command::new(binary)
    .arg(INFO_FLAG)
    .output()
    .await
    .map_err(|e| DescribeError::Spawn { source: e })?;

  if !output.status.success() {
    return Err(DescribeError::Exit {
      code: output.status.code(),
    });
  }

  let report: SelfReport =
    serde_json::from_slice(&output.stdout).map_err(|e| DescribeError::Decode { source: e })?;

  debug!(name = %report.name, version = %report.version, "decoded self-report");
  Ok(report)
}
