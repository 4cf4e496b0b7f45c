use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

/// effe - compile and package effe logic units
#[derive(Parser)]
#[command(name = "effe")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Scaffold a new logic unit from the built-in template
  New {
    /// Path of the file to create
    path: PathBuf,
  },

  /// Compile a logic unit, or every file under a directory
  Compile {
    /// Source file or directory
    path: PathBuf,

    /// Explicit executable name (single files only)
    #[arg(long = "out")]
    out: Option<String>,

    /// Directory the executables land in
    #[arg(long = "dirout", default_value = "out")]
    dirout: PathBuf,

    /// Keep temporary workspaces for debugging
    #[arg(long)]
    keep_temp: bool,
  },

  /// Package compiled artifacts into container images
  Docker {
    /// Artifact file or directory of artifacts
    path: PathBuf,

    /// Keep temporary image contexts for debugging
    #[arg(long)]
    keep_temp: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .without_time()
    .init();

  match cli.command {
    Commands::New { path } => cmd::cmd_new(&path),
    Commands::Compile {
      path,
      out,
      dirout,
      keep_temp,
    } => cmd::cmd_compile(&path, out, dirout, keep_temp),
    Commands::Docker { path, keep_temp } => cmd::cmd_docker(&path, keep_temp),
  }
}
