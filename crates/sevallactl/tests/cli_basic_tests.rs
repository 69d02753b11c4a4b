use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command isolated from the caller's environment and config file
fn sevallactl(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sevallactl").unwrap();
    cmd.env_remove("SEVALLA_TOKEN")
        .env_remove("SEVALLA_BASE_URL")
        .env_remove("SEVALLA_PROFILE")
        .env_remove("SEVALLA_CONFIG_FILE")
        .env_remove("RUST_LOG")
        .arg("--config-file")
        .arg(dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sevalla resource provider CLI"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sevallactl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_args_shows_usage() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_resource_help_lists_lifecycle() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args(["resource", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_types() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args(["types", "--token", "test-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sevalla_application"))
        .stdout(predicate::str::contains("sevalla_company_users"));
}

#[test]
fn test_types_yaml() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args(["types", "--token", "test-token", "-o", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resources:"))
        .stdout(predicate::str::contains("- sevalla_site"));
}

#[test]
fn test_missing_token() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .arg("types")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unable to find token"))
        .stderr(predicate::str::contains("SEVALLA_TOKEN"));
}

#[test]
fn test_token_from_env() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .env("SEVALLA_TOKEN", "env-token")
        .arg("types")
        .assert()
        .success();
}

#[test]
fn test_unknown_profile() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args(["types", "--profile", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'nope' not found"));
}

#[test]
fn test_corrupt_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "[[[broken").unwrap();
    sevallactl(&dir)
        .args(["types", "--token", "test-token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_unknown_resource_type() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args(["resource", "read", "sevalla_nope", "x", "--token", "test-token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource type 'sevalla_nope'"));
}

#[test]
fn test_invalid_data() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args([
            "resource",
            "create",
            "sevalla_pipeline",
            "--data",
            "{broken",
            "--token",
            "test-token",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON"));
}

#[test]
fn test_zero_poll_interval_rejected() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args(["operation", "wait", "op_1", "--interval", "0", "--token", "t"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--interval"));
}

#[test]
fn test_invalid_base_url() {
    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args(["types", "--token", "t", "--base-url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid base URL"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_through_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pipelines/pl_1"))
        .and(header("authorization", "Bearer profile-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pl_1",
            "display_name": "release",
            "stages": [{"id": "st_1", "display_name": "Production", "type": "standard"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        format!(
            "default_profile = \"dev\"\n\n[profiles.dev]\ntoken = \"profile-token\"\nbase_url = \"{}\"\n",
            server.uri()
        ),
    )
    .unwrap();

    sevallactl(&dir)
        .args(["resource", "read", "sevalla_pipeline", "pl_1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"display_name\": \"release\""))
        .stdout(predicate::str::contains("\"type\": \"standard\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_merges_over_current_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pipelines/pl_1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "pl_1", "display_name": "release"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/pipelines/pl_1"))
        .and(body_json(json!({"display_name": "ship-it"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "pl_1", "display_name": "ship-it"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args([
            "resource",
            "update",
            "sevalla_pipeline",
            "pl_1",
            "--data",
            r#"{"display_name":"ship-it"}"#,
            "--token",
            "test-token",
            "--base-url",
            &server.uri(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ship-it"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_missing_resource() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications/app_404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Application not found"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args([
            "resource",
            "read",
            "sevalla_application",
            "app_404",
            "--token",
            "test-token",
            "--base-url",
            &server.uri(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "sevalla_application 'app_404' does not exist",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lookup_company_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company/co_1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "company": {"users": [{"user": {"id": "u1", "email": "ada@example.com"}}]}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args([
            "lookup",
            "sevalla_company_users",
            "--data",
            r#"{"company_id":"co_1"}"#,
            "--token",
            "test-token",
            "--base-url",
            &server.uri(),
            "-o",
            "yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("email: ada@example.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_operation_wait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/operations/op_9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "op_9",
            "status": "COMPLETED",
            "resource_id": "site_42"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    sevallactl(&dir)
        .args([
            "operation",
            "wait",
            "op_9",
            "--interval",
            "1",
            "--timeout",
            "30",
            "--token",
            "test-token",
            "--base-url",
            &server.uri(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"resource_id\": \"site_42\""))
        .stderr(predicate::str::contains("Waiting for operation op_9"));
}
