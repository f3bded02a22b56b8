use std::io::Write;

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

fn bb_status(config: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("bb-status").unwrap();
    cmd.env("BB_STATUS_CONFIG", config.path());
    for var in [
        "BB_STATUS_DRIVER",
        "BB_STATUS_ACCESS_TOKEN",
        "BB_STATUS_CLIENT_ID",
        "BB_STATUS_CLIENT_SECRET",
        "BB_STATUS_ENDPOINT",
        "BB_STATUS_USERNAME",
        "BB_STATUS_PASSWORD",
        "BB_STATUS_DEBUG",
        "BB_STATUS_REPO",
        "BB_STATUS_COMMIT",
        "BB_STATUS_BUILD_URL",
        "BB_STATUS_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

const STATUS_ARGS: [&str; 9] = [
    "set",
    "--commit",
    "abc123",
    "--state",
    "SUCCESSFUL",
    "--key",
    "ci",
    "--url",
    "https://ci.example.com/1",
];

/// An unknown driver exits with the usage code before any request
#[test]
fn test_invalid_driver_exits_without_request() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();
    let config = config_file("");

    bb_status(&config)
        .args(STATUS_ARGS)
        .args(["--driver", "Bitbucket Enterprise"])
        .args(["--endpoint", server.url().as_str(), "--username", "ci", "--password", "pw"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "must be: Bitbucket Server or Bitbucket Cloud",
        ));

    mock.assert();
}

#[test]
fn test_missing_driver_is_usage_error() {
    let config = config_file("");

    bb_status(&config)
        .args(STATUS_ARGS)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--driver"));
}

#[test]
fn test_server_status_posted() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/rest/build-status/1.0/commits/abc123")
        .with_status(204)
        .create();
    let config = config_file("");

    bb_status(&config)
        .args(STATUS_ARGS)
        .args(["--driver", "Bitbucket Server"])
        .args(["--endpoint", format!("{}/", server.url()).as_str()])
        .args(["--username", "ci", "--password", "pw", "--no-verify-ssl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("posted for abc123"));

    mock.assert();
}

#[test]
fn test_server_settings_from_config_file() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/rest/build-status/1.0/commits/abc123")
        .match_body(Matcher::PartialJson(serde_json::json!({"key": "ci", "name": "Nightly"})))
        .with_status(204)
        .create();
    let config = config_file(&format!(
        "driver = \"Bitbucket Server\"\n\n[server]\nendpoint = \"{}\"\nusername = \"ci\"\n\n[status]\nname = \"Nightly\"\n",
        server.url()
    ));

    bb_status(&config)
        .args(STATUS_ARGS)
        .env("BB_STATUS_PASSWORD", "pw")
        .assert()
        .success();

    mock.assert();
}

#[test]
fn test_cloud_not_found_exit_code() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/2.0/repositories/myorg/myrepo/commit/abc123/statuses/build")
        .match_header("authorization", "Bearer tok")
        .with_status(404)
        .with_body("{}")
        .create();
    let config = config_file(&format!("[cloud]\napi_url = \"{}/2.0\"\n", server.url()));

    bb_status(&config)
        .args(STATUS_ARGS)
        .args(["--driver", "Bitbucket Cloud", "--repo", "myorg/myrepo"])
        .args(["--access-token", "tok"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains(
            "HTTP 404 Not Found - Does the repo supplied exist?",
        ));

    mock.assert();
}

/// Without an access token the client credentials are exchanged first
#[test]
fn test_cloud_exchanges_client_credentials() {
    let mut server = mockito::Server::new();
    let token = server
        .mock("POST", "/site/oauth2/access_token")
        .with_status(200)
        .with_body(r#"{"access_token": "fresh"}"#)
        .create();
    let status = server
        .mock("POST", "/2.0/repositories/myorg/myrepo/commit/abc123/statuses/build")
        .match_header("authorization", "Bearer fresh")
        .with_status(201)
        .with_body("{}")
        .create();
    let config = config_file(&format!(
        "[cloud]\napi_url = \"{url}/2.0\"\ntoken_url = \"{url}/site/oauth2/access_token\"\n",
        url = server.url()
    ));

    bb_status(&config)
        .args(STATUS_ARGS)
        .args(["--driver", "Bitbucket Cloud", "--repo", "myorg/myrepo"])
        .args(["--client-id", "id", "--client-secret", "secret"])
        .assert()
        .success();

    token.assert();
    status.assert();
}

#[test]
fn test_token_command_prints_token() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/site/oauth2/access_token")
        .with_status(200)
        .with_body(r#"{"access_token": "printed-token"}"#)
        .create();
    let config = config_file(&format!(
        "[cloud]\ntoken_url = \"{}/site/oauth2/access_token\"\n",
        server.url()
    ));

    bb_status(&config)
        .args(["token", "--client-id", "id", "--client-secret", "secret"])
        .assert()
        .success()
        .stdout("printed-token\n");
}

#[test]
fn test_token_rejected_exit_code() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/site/oauth2/access_token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create();
    let config = config_file(&format!(
        "[cloud]\ntoken_url = \"{}/site/oauth2/access_token\"\n",
        server.url()
    ));

    bb_status(&config)
        .args(["token", "--client-id", "id", "--client-secret", "secret"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Are your bitbucket credentials correct?"));
}

#[test]
fn test_version() {
    let config = config_file("");

    bb_status(&config)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bb-status version"));
}
