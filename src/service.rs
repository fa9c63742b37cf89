//! Service stop/start around the file-replacement step.
//!
//! The named service and every unit that transitively depends on it are
//! stopped before files are replaced and started again afterwards.
//! Dependents stop before the service itself; starting mirrors that order
//! (service first, then dependents).

use std::path::PathBuf;
use std::process::Command;

use crate::error::{ResupplyError, Result};

/// Primitive service operations, kept behind a trait so ordering logic is
/// testable without a live service manager.
pub trait ServiceController {
    /// Units that transitively depend on `service`.
    fn dependents(&self, service: &str) -> Result<Vec<String>>;

    /// Stop one unit.
    fn stop(&self, unit: &str) -> Result<()>;

    /// Start one unit.
    fn start(&self, unit: &str) -> Result<()>;
}

/// Stop `service` and everything that depends on it.
///
/// Dependents are stopped first, the service itself last. Returns the
/// dependent set so the caller can restart the same units later. Any
/// failure aborts immediately, before file mutation.
pub fn stop_service(ctl: &dyn ServiceController, service: &str) -> Result<Vec<String>> {
    let dependents = ctl.dependents(service)?;
    for unit in &dependents {
        tracing::info!("Stopping dependent unit {}", unit);
        ctl.stop(unit)?;
    }
    tracing::info!("Stopping {}", service);
    ctl.stop(service)?;
    Ok(dependents)
}

/// Start `service` and the dependents stopped earlier.
///
/// The mirror of [`stop_service`]: the service starts first, dependents
/// after it.
pub fn start_service(
    ctl: &dyn ServiceController,
    service: &str,
    dependents: &[String],
) -> Result<()> {
    tracing::info!("Starting {}", service);
    ctl.start(service)?;
    for unit in dependents {
        tracing::info!("Starting dependent unit {}", unit);
        ctl.start(unit)?;
    }
    Ok(())
}

/// Controls services through `systemctl`.
#[derive(Debug, Clone)]
pub struct SystemdController {
    systemctl: PathBuf,
}

impl SystemdController {
    pub fn new() -> Self {
        Self {
            systemctl: PathBuf::from("systemctl"),
        }
    }

    fn run(&self, args: &[&str], service: &str) -> Result<String> {
        let output = Command::new(&self.systemctl).args(args).output().map_err(|e| {
            ResupplyError::ServiceControl {
                service: service.to_string(),
                message: format!("failed to run {}: {}", self.systemctl.display(), e),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResupplyError::ServiceControl {
                service: service.to_string(),
                message: format!(
                    "systemctl {} exited with {}: {}",
                    args.join(" "),
                    output.status,
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn ensure_exists(&self, service: &str) -> Result<()> {
        let state = self.run(&["show", "-p", "LoadState", "--value", service], service)?;
        if state.trim() == "not-found" {
            return Err(ResupplyError::ServiceControl {
                service: service.to_string(),
                message: "unit not found".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SystemdController {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceController for SystemdController {
    fn dependents(&self, service: &str) -> Result<Vec<String>> {
        self.ensure_exists(service)?;
        let output = self.run(
            &[
                "list-dependencies",
                "--reverse",
                "--plain",
                "--no-pager",
                service,
            ],
            service,
        )?;
        Ok(parse_reverse_dependencies(&output))
    }

    fn stop(&self, unit: &str) -> Result<()> {
        self.run(&["stop", unit], unit)?;
        Ok(())
    }

    fn start(&self, unit: &str) -> Result<()> {
        self.run(&["start", unit], unit)?;
        Ok(())
    }
}

/// Parse `systemctl list-dependencies --reverse --plain` output.
///
/// The first line is the queried unit itself; the indented lines below it
/// are the transitive reverse-dependency tree.
fn parse_reverse_dependencies(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
