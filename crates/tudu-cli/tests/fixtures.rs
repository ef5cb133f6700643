//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

/// Creates a temp TUDU_HOME directory for test isolation.
pub fn temp_tudu_home() -> TempDir {
    TempDir::new().expect("create temp tudu home")
}

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Seeds a stored token file, as `tudu login` would have written it.
pub fn seed_tokens(home: &Path, access: &str, refresh: Option<&str>) {
    let mut body = json!({ "access_token": access });
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    fs::write(
        home.join("tokens.json"),
        serde_json::to_string_pretty(&body).expect("serialize tokens"),
    )
    .expect("write tokens.json");
}

/// Reads the stored token file as raw text, empty string if absent.
pub fn read_tokens(home: &Path) -> String {
    fs::read_to_string(home.join("tokens.json")).unwrap_or_default()
}
