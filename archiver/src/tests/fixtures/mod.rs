use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src/tests/fixtures")
}

/// Load a JSON fixture by name
pub fn load_json_fixture(fixture_name: &str) -> Value {
    let path = fixtures_dir().join(format!("{}.json", fixture_name));
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load test fixture: {}", fixture_name));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Test fixture {} is not valid JSON: {}", fixture_name, e))
}

/// Load a fixture holding a JSON array
pub fn load_json_array(fixture_name: &str) -> Vec<Value> {
    match load_json_fixture(fixture_name) {
        Value::Array(items) => items,
        other => panic!("Test fixture {} is not an array: {}", fixture_name, other),
    }
}
