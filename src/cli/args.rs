//! CLI argument definitions.
//!
//! All CLI arguments are defined with clap's derive macros. The main entry
//! point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::github::RepoRef;

/// Resupply - keeps deployed GitHub release artifacts up to date.
#[derive(Debug, Parser)]
#[command(name = "resupply")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Minimal output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check for a newer release and install it
    Update(UpdateArgs),

    /// Report what an update would do, without side effects
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `update` command.
#[derive(Debug, Clone, clap::Args)]
pub struct UpdateArgs {
    /// Project name (keys the version record; target is ROOT/NAME)
    #[arg(short, long)]
    pub name: String,

    /// GitHub repository as OWNER/NAME
    #[arg(short, long)]
    pub repo: RepoRef,

    /// Glob pattern selecting the release asset
    #[arg(short, long)]
    pub asset: String,

    /// Root path releases install under
    #[arg(long)]
    pub root: PathBuf,

    /// Include pre-releases when resolving the newest release
    #[arg(short, long)]
    pub prerelease: bool,

    /// Service to stop (with its dependents) around the install
    #[arg(short, long)]
    pub service: Option<String>,

    /// Directory holding version records
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Deprecated: wrapper directories are detected and flattened automatically
    #[arg(long, hide = true)]
    pub flatten: bool,

    /// Override the releases API base URL
    #[arg(long, hide = true, env = "RESUPPLY_API_BASE")]
    pub api_base: Option<String>,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Project name (keys the version record)
    #[arg(short, long)]
    pub name: String,

    /// GitHub repository as OWNER/NAME
    #[arg(short, long)]
    pub repo: RepoRef,

    /// Glob pattern selecting the release asset
    #[arg(short, long)]
    pub asset: String,

    /// Include pre-releases when resolving the newest release
    #[arg(short, long)]
    pub prerelease: bool,

    /// Directory holding version records
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Override the releases API base URL
    #[arg(long, hide = true, env = "RESUPPLY_API_BASE")]
    pub api_base: Option<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
