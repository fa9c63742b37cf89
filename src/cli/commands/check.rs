//! The `check` command: resolve and report, never mutate.

use super::dispatcher::{Command, CommandResult};
use crate::assets::select_asset;
use crate::cli::args::CheckArgs;
use crate::decision::{decide, Decision};
use crate::error::Result;
use crate::github::ReleaseClient;
use crate::store::VersionStore;
use crate::ui::Output;

/// Reports whether an update is pending for a project.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }
}

impl Command for CheckCommand {
    fn execute(&self, output: &Output) -> Result<CommandResult> {
        let args = &self.args;

        let store = VersionStore::new(
            args.state_dir
                .clone()
                .unwrap_or_else(VersionStore::default_dir),
        );
        let local = store.load(&args.name)?;

        let client = match &args.api_base {
            Some(base) => ReleaseClient::with_api_base(base),
            None => ReleaseClient::new(),
        };
        let release = client.resolve(&args.repo, args.prerelease)?;
        let asset = select_asset(&release.assets, &args.asset)?;

        match local {
            Some(stamp) => output.status(&format!("Installed: {}", stamp.to_rfc3339())),
            None => output.status("Installed: none"),
        }
        output.status(&format!(
            "Available: {} ({}, {})",
            asset.created_at.to_rfc3339(),
            release.tag_name,
            asset.name
        ));

        match decide(local, asset.created_at) {
            Decision::Install => {
                output.status(&format!("Update pending for {}", args.name));
            }
            Decision::UpToDate => {
                output.status(&format!("{} is up to date (same date)", args.name));
            }
        }

        Ok(CommandResult::success())
    }
}
