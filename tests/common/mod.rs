//! Shared test helpers for integration tests
//!
//! Every command runs against a `wiremock` server standing in for the items
//! API. The user's own config file and environment are kept out of the way.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::OnceLock;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An empty config file, so the user's own config is never read
pub fn empty_config() -> &'static PathBuf {
    static EMPTY: OnceLock<PathBuf> = OnceLock::new();
    EMPTY.get_or_init(|| {
        let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("stockpile-empty-config.yaml");
        std::fs::write(&path, "").unwrap();
        path
    })
}

/// Helper to get a stockpile command isolated from the host environment,
/// leaving color on
pub fn stockpile_with_color() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("stockpile"));
    cmd.env_remove("STOCKPILE_API_URL")
        .env_remove("STOCKPILE_LOG")
        .env("STOCKPILE_CONFIG", empty_config());
    cmd
}

/// Helper to get a stockpile command isolated from the host environment
pub fn stockpile() -> Command {
    let mut cmd = stockpile_with_color();
    cmd.arg("--no-color");
    cmd
}

/// Helper to get a stockpile command pointed at `server`
pub fn stockpile_at(server: &MockServer) -> Command {
    let mut cmd = stockpile();
    cmd.arg("--api-url").arg(api_url(server));
    cmd
}

pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

pub fn item_json(id: i64, name: &str, quantity: u64, created_at: Option<&str>) -> Value {
    match created_at {
        Some(at) => json!({ "id": id, "name": name, "quantity": quantity, "created_at": at }),
        None => json!({ "id": id, "name": name, "quantity": quantity }),
    }
}

/// Three items covering every stock level
pub fn sample_items() -> Value {
    json!([
        item_json(1, "Hex Bolt", 0, Some("2024-01-01T09:00:00Z")),
        item_json(2, "Nut", 5, Some("2024-02-10 08:30:00")),
        item_json(3, "Washer", 40, None),
    ])
}

/// Serve `body` for `GET /api/items`
pub async fn mount_items(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
