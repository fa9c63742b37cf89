//! End-to-end tests for the resupply CLI.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Build an in-memory zip from `(entry_name, contents)` pairs.
fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default();
        for (name, contents) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    cursor.into_inner()
}

fn latest_release_json(server: &MockServer, asset_name: &str, created_at: &str) -> String {
    format!(
        r#"{{
            "tag_name": "v1.2.0",
            "prerelease": false,
            "assets": [
                {{
                    "name": "{name}",
                    "created_at": "{created_at}",
                    "browser_download_url": "{url}"
                }}
            ]
        }}"#,
        name = asset_name,
        created_at = created_at,
        url = server.url(format!("/dl/{}", asset_name))
    )
}

fn update_cmd(server: &MockServer, root: &Path, state: &Path) -> Command {
    let base = server.base_url();
    let mut cmd = Command::new(cargo_bin("resupply"));
    cmd.args([
        "update",
        "--name",
        "widget",
        "--repo",
        "contoso/widget",
        "--asset",
        "widget-*.zip",
        "--api-base",
        base.as_str(),
    ]);
    cmd.arg("--root").arg(root);
    cmd.arg("--state-dir").arg(state);
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("resupply"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("GitHub release"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("resupply"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn first_install_downloads_extracts_and_records() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let root = temp.path().join("apps");
    let state = temp.path().join("versions");

    let release = server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases/latest");
        then.status(200)
            .header("content-type", "application/json")
            .body(latest_release_json(
                &server,
                "widget-1.2.0-win64.zip",
                "2024-01-01T00:00:00Z",
            ));
    });
    let download = server.mock(|when, then| {
        when.method(GET).path("/dl/widget-1.2.0-win64.zip");
        then.status(200)
            .body(build_zip(&[("widget.txt", "payload v1.2.0")]));
    });

    update_cmd(&server, &root, &state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed: none"))
        .stdout(predicate::str::contains("updated to v1.2.0"));

    release.assert();
    download.assert();

    assert_eq!(
        fs::read_to_string(root.join("widget/widget.txt"))?,
        "payload v1.2.0"
    );
    let record = fs::read_to_string(state.join("widget.yml"))?;
    assert!(record.contains("2024-01-01T00:00:00"));
    Ok(())
}

#[test]
fn same_date_rerun_skips_without_downloading() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let root = temp.path().join("apps");
    let state = temp.path().join("versions");

    server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases/latest");
        then.status(200)
            .header("content-type", "application/json")
            .body(latest_release_json(
                &server,
                "widget-1.2.0-win64.zip",
                "2024-01-01T00:00:00Z",
            ));
    });
    let download = server.mock(|when, then| {
        when.method(GET).path("/dl/widget-1.2.0-win64.zip");
        then.status(200)
            .body(build_zip(&[("widget.txt", "payload")]));
    });

    update_cmd(&server, &root, &state).assert().success();
    update_cmd(&server, &root, &state)
        .assert()
        .success()
        .stdout(predicate::str::contains("same date"));

    // the second run decided to skip before fetching the binary again
    download.assert_hits(1);
    Ok(())
}

#[test]
fn newer_remote_release_reinstalls() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let root = temp.path().join("apps");
    let state = temp.path().join("versions");

    let release = server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases/latest");
        then.status(200)
            .header("content-type", "application/json")
            .body(latest_release_json(
                &server,
                "widget-1.3.0-win64.zip",
                "2024-02-01T00:00:00Z",
            ));
    });
    let download = server.mock(|when, then| {
        when.method(GET).path("/dl/widget-1.3.0-win64.zip");
        then.status(200)
            .body(build_zip(&[("widget.txt", "payload v1.3.0")]));
    });

    // simulate an older install
    fs::create_dir_all(&state)?;
    fs::write(
        state.join("widget.yml"),
        "name: widget\ncreated_at: 2024-01-01T00:00:00Z\n",
    )?;

    update_cmd(&server, &root, &state).assert().success();

    release.assert();
    download.assert();
    let record = fs::read_to_string(state.join("widget.yml"))?;
    assert!(record.contains("2024-02-01T00:00:00"));
    Ok(())
}

#[test]
fn no_matching_asset_fails_before_download() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let root = temp.path().join("apps");
    let state = temp.path().join("versions");

    server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases/latest");
        then.status(200)
            .header("content-type", "application/json")
            .body(latest_release_json(
                &server,
                "widget-1.2.0-linux.tar.gz",
                "2024-01-01T00:00:00Z",
            ));
    });
    let download = server.mock(|when, then| {
        when.method(GET).path("/dl/widget-1.2.0-linux.tar.gz");
        then.status(200).body("unreachable");
    });

    update_cmd(&server, &root, &state)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No release asset matches"));

    download.assert_hits(0);
    assert!(!state.join("widget.yml").exists());
    assert!(!root.exists());
    Ok(())
}

#[test]
fn api_failure_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let root = temp.path().join("apps");
    let state = temp.path().join("versions");

    server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases/latest");
        then.status(500);
    });

    update_cmd(&server, &root, &state)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Network error"));

    assert!(!state.join("widget.yml").exists());
    Ok(())
}

#[test]
fn prerelease_mode_uses_release_list() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let root = temp.path().join("apps");
    let state = temp.path().join("versions");

    let list = server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases");
        then.status(200)
            .header("content-type", "application/json")
            .body(format!(
                r#"[
                    {{
                        "tag_name": "v2.0.0-rc.1",
                        "prerelease": true,
                        "assets": [
                            {{
                                "name": "widget-2.0.0-rc.1-win64.zip",
                                "created_at": "2024-03-01T00:00:00Z",
                                "browser_download_url": "{url}"
                            }}
                        ]
                    }}
                ]"#,
                url = server.url("/dl/widget-2.0.0-rc.1-win64.zip")
            ));
    });
    server.mock(|when, then| {
        when.method(GET).path("/dl/widget-2.0.0-rc.1-win64.zip");
        then.status(200).body(build_zip(&[("widget.txt", "rc1")]));
    });

    let mut cmd = update_cmd(&server, &root, &state);
    cmd.arg("--prerelease");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("updated to v2.0.0-rc.1"));

    list.assert();
    Ok(())
}

#[test]
fn single_root_archive_is_flattened_into_target() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let root = temp.path().join("apps");
    let state = temp.path().join("versions");

    server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases/latest");
        then.status(200)
            .header("content-type", "application/json")
            .body(latest_release_json(
                &server,
                "widget-1.2.0-win64.zip",
                "2024-01-01T00:00:00Z",
            ));
    });
    server.mock(|when, then| {
        when.method(GET).path("/dl/widget-1.2.0-win64.zip");
        then.status(200).body(build_zip(&[
            ("payload/a.txt", "alpha"),
            ("payload/sub/b.txt", "beta"),
        ]));
    });

    update_cmd(&server, &root, &state).assert().success();

    assert_eq!(fs::read_to_string(root.join("widget/a.txt"))?, "alpha");
    assert_eq!(fs::read_to_string(root.join("widget/sub/b.txt"))?, "beta");
    assert!(!root.join("widget/payload").exists());
    Ok(())
}

#[test]
fn check_reports_pending_update_without_side_effects() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let state = temp.path().join("versions");

    server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases/latest");
        then.status(200)
            .header("content-type", "application/json")
            .body(latest_release_json(
                &server,
                "widget-1.2.0-win64.zip",
                "2024-01-01T00:00:00Z",
            ));
    });
    let download = server.mock(|when, then| {
        when.method(GET).path("/dl/widget-1.2.0-win64.zip");
        then.status(200).body("unreachable");
    });

    let base = server.base_url();
    let mut cmd = Command::new(cargo_bin("resupply"));
    cmd.args([
        "check",
        "--name",
        "widget",
        "--repo",
        "contoso/widget",
        "--asset",
        "widget-*.zip",
        "--api-base",
        base.as_str(),
    ]);
    cmd.arg("--state-dir").arg(&state);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Update pending for widget"));

    download.assert_hits(0);
    assert!(!state.exists());
    Ok(())
}

#[test]
fn corrupt_version_record_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let root = temp.path().join("apps");
    let state = temp.path().join("versions");

    fs::create_dir_all(&state)?;
    fs::write(state.join("widget.yml"), "not: [valid")?;

    let release = server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases/latest");
        then.status(200).body("{}");
    });

    update_cmd(&server, &root, &state)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Version record error"));

    // the record is read before the API is consulted
    release.assert_hits(0);
    Ok(())
}

#[test]
fn quiet_mode_suppresses_status_lines() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;
    let root = temp.path().join("apps");
    let state = temp.path().join("versions");

    server.mock(|when, then| {
        when.method(GET).path("/repos/contoso/widget/releases/latest");
        then.status(200)
            .header("content-type", "application/json")
            .body(latest_release_json(
                &server,
                "widget-1.2.0-win64.zip",
                "2024-01-01T00:00:00Z",
            ));
    });
    server.mock(|when, then| {
        when.method(GET).path("/dl/widget-1.2.0-win64.zip");
        then.status(200).body(build_zip(&[("widget.txt", "payload")]));
    });

    let mut cmd = update_cmd(&server, &root, &state);
    cmd.arg("--quiet");
    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty());

    // the install itself still happened
    assert!(root.join("widget/widget.txt").exists());
    Ok(())
}
