//! The `update` command: the full check-download-install flow.

use super::dispatcher::{Command, CommandResult};
use crate::assets::select_asset;
use crate::cli::args::UpdateArgs;
use crate::decision::{decide, Decision};
use crate::error::Result;
use crate::github::ReleaseClient;
use crate::install::{self, Downloader};
use crate::service::{self, SystemdController};
use crate::store::VersionStore;
use crate::ui::Output;

/// Runs one update cycle for a project.
pub struct UpdateCommand {
    args: UpdateArgs,
}

impl UpdateCommand {
    pub fn new(args: UpdateArgs) -> Self {
        Self { args }
    }
}

impl Command for UpdateCommand {
    fn execute(&self, output: &Output) -> Result<CommandResult> {
        let args = &self.args;

        if args.flatten {
            tracing::warn!(
                "--flatten is deprecated; wrapper directories are detected and flattened automatically"
            );
        }

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
        let asset = select_asset(&release.assets, &args.asset)?.clone();

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

        if decide(local, asset.created_at) == Decision::UpToDate {
            output.status(&format!(
                "{} is up to date (same date), nothing to do",
                args.name
            ));
            return Ok(CommandResult::success());
        }

        // Stop the service (and its dependents) before touching any files
        let controller = SystemdController::new();
        let stopped = match &args.service {
            Some(name) => Some(service::stop_service(&controller, name)?),
            None => None,
        };

        let target_dir = args.root.join(&args.name);
        output.status(&format!(
            "Installing {} into {}",
            asset.name,
            target_dir.display()
        ));

        let downloader = Downloader::new(output.mode().shows_progress());
        let staging = install::fetch_and_install(
            &downloader,
            &asset.browser_download_url,
            &asset.name,
            &target_dir,
        )?;

        // Record the installed release only after extraction succeeded
        store.save(&args.name, asset.created_at)?;
        install::cleanup_staging(staging);

        if let (Some(name), Some(dependents)) = (&args.service, &stopped) {
            service::start_service(&controller, name, dependents)?;
        }

        output.success(&format!(
            "{} updated to {} ({})",
            args.name,
            release.tag_name,
            asset.created_at.to_rfc3339()
        ));
        Ok(CommandResult::success())
    }
}
