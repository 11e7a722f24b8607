//! Helpers for running the `ieeg` binary against a mock repository.

#![allow(dead_code)]

use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER: &str = "alice";
pub const PASSWORD: &str = "secret";
pub const DATASET: &str = "Study 005";
pub const ID: &str = "snap-0005";
pub const BASE: &str = "/services/timeseries";

/// Run the CLI binary with arguments and a clean environment.
pub fn run_cli(args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ieeg"));
    cmd.args(args);
    for var in [
        "IEEG_USER",
        "IEEG_PASSWORD",
        "IEEG_HOST",
        "IEEG_PORT",
        "IEEG_TIMEOUT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI against `server` as the test user, off the async runtime.
pub async fn run_against(server: &MockServer, args: &[&str]) -> Output {
    let port = server.address().port().to_string();
    let mut full: Vec<String> = [
        "-u", USER, "-p", PASSWORD, "--host", "127.0.0.1", "--port", port.as_str(), "--http",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    full.extend(args.iter().map(|s| s.to_string()));

    tokio::task::spawn_blocking(move || {
        let refs: Vec<&str> = full.iter().map(String::as_str).collect();
        run_cli(&refs)
    })
    .await
    .unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Mount id resolution, a two-channel details document and the layer counts.
pub async fn mount_dataset(server: &MockServer, layers: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("{BASE}/getIdByDataSnapshotName/Study%20005")))
        .and(basic_auth(USER, PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_string(ID))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/getDataSnapshotTimeSeriesDetails/{ID}")))
        .and(basic_auth(USER, PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<dataSnapshot><details>\
             <detail><channelLabel>LEFT_01</channelLabel><sampleRate>500.0</sampleRate></detail>\
             <detail><channelLabel>LEFT_02</channelLabel><sampleRate>500.0</sampleRate></detail>\
             </details>\
             <montage name=\"Bipolar\"><pair channel=\"LEFT_01\" ref=\"LEFT_02\"/></montage>\
             </dataSnapshot>",
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/getCountsByLayer/{ID}")))
        .and(basic_auth(USER, PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "countsByLayer": layers })))
        .mount(server)
        .await;
}

pub fn annotation(layer: &str, start: i64, end: i64) -> serde_json::Value {
    json!({
        "creator": "seed",
        "type": "Event",
        "description": "",
        "layer": layer,
        "startTimeOffsetUsec": start,
        "endTimeOffsetUsec": end
    })
}
