//! Subcommand implementations.

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod update;

pub use dispatcher::{dispatch, Command, CommandResult};
