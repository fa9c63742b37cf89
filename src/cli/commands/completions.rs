//! The `completions` command.

use clap::CommandFactory;

use super::dispatcher::CommandResult;
use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::Result;

/// Generate shell completions on stdout.
pub fn execute(args: &CompletionsArgs) -> Result<CommandResult> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "resupply", &mut std::io::stdout());
    Ok(CommandResult::success())
}
