//! effe-lib: build-and-package pipeline for effe logic units
//!
//! A logic unit is a small self-contained source file exposing
//! `Init`/`Start`/`Run`/`Stop`. This crate turns such units into
//! standalone executables and container images:
//!
//! - `scaffold`: create a new unit from the built-in template
//! - `stage`: isolated per-compilation workspace with scoped cleanup
//! - `build`: external compiler invocation
//! - `describe`: the `-info` self-report protocol
//! - `naming`: explicit name / self-report / content-hash fallback chain
//! - `relocate`: move artifacts to their final destination
//! - `compile`: the single-file pipeline and the best-effort tree walk
//! - `docker`: image-context staging, tagging, and `docker build`

pub mod build;
pub mod compile;
pub mod describe;
pub mod docker;
pub mod naming;
pub mod relocate;
pub mod scaffold;
pub mod stage;
pub mod templates;
mod util;
