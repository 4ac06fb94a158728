// ABOUTME: Integration tests for the ucdeploy CLI commands.
// ABOUTME: Validates --help output, init, sites, and publish short-circuits.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn ucdeploy_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ucdeploy"))
}

const CONFIG: &str = r#"sites:
  - profile_name: prod
    url: https://ucd.example.com:8443
    user: admin
    password: hunter2
    skip_props: true
  - https://staging.example.com
publish:
  deploy:
    application: shop
    environment: DEV
    process: Deploy
"#;

#[test]
fn help_shows_commands() {
    ucdeploy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("sites"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("ucdeploy.yml");

    ucdeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(config_path.exists(), "ucdeploy.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("sites:"), "Config should have a site list");
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("ucdeploy.yml");

    fs::write(&config_path, "existing: config").unwrap();

    ucdeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn sites_lists_profiles_without_secrets() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("ucdeploy.yml"), CONFIG).unwrap();

    ucdeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("sites")
        .assert()
        .success()
        .stdout(predicate::str::contains("prod\thttps://ucd.example.com:8443\t[skip-props]"))
        .stdout(predicate::str::contains("https://staging.example.com"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn missing_config_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();

    ucdeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("sites")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn publish_skips_failed_upstream_without_contacting_server() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("custom.yml");
    fs::write(&config_path, CONFIG).unwrap();

    ucdeploy_cmd()
        .args(["--config", config_path.to_str().unwrap()])
        .args(["publish", "--upstream", "failure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped: upstream build result is failure"));
}

#[test]
fn publish_reports_configuration_abort() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = CONFIG.replace("    environment: DEV\n", "    environment: \"\"\n");
    fs::write(temp_dir.path().join("ucdeploy.yml"), config).unwrap();

    ucdeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("publish")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error: invalid step configuration: missing required field: deploy.environment",
        ));
}

#[test]
fn publish_abort_is_a_json_event_in_json_mode() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = CONFIG.replace("    environment: DEV\n", "    environment: \"\"\n");
    fs::write(temp_dir.path().join("ucdeploy.yml"), config).unwrap();

    let assert = ucdeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["publish", "--output", "json"])
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    let line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("a JSON error event on stderr");
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["event"], "error");
    assert!(
        event["message"]
            .as_str()
            .unwrap()
            .contains("missing required field: deploy.environment")
    );
}

#[test]
fn verify_unknown_site_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("ucdeploy.yml"), CONFIG).unwrap();

    ucdeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["verify", "--site", "qa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no site profile named 'qa'"));
}
