//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`dispatch`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::Output;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self, output: &Output) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Route the CLI subcommand to its implementation and execute it.
pub fn dispatch(cli: &Cli, output: &Output) -> Result<CommandResult> {
    match &cli.command {
        Commands::Update(args) => {
            let cmd = super::update::UpdateCommand::new(args.clone());
            cmd.execute(output)
        }
        Commands::Check(args) => {
            let cmd = super::check::CheckCommand::new(args.clone());
            cmd.execute(output)
        }
        Commands::Completions(args) => super::completions::execute(args),
    }
}
