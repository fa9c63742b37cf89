//! Command-line interface.

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, CompletionsArgs, UpdateArgs};
pub use commands::{dispatch, CommandResult};
