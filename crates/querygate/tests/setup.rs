use std::io::Write;

use assert_cmd::cmd::Command;
use tempfile::NamedTempFile;

#[allow(dead_code)]
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

pub const PERMISSIONS: &str = r#"{"admin": null, "analyst": ["memory", "tpch"]}"#;

pub fn make_cli() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).expect("Failed to find binary")
}

pub fn json_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}
