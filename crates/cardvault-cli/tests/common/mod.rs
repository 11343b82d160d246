use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// An isolated config and data directory for one test.
pub struct Sandbox {
    dir: TempDir,
    scryfall_url: String,
}

impl Sandbox {
    pub fn new(scryfall_url: impl Into<String>) -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
            scryfall_url: scryfall_url.into(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn write_config(&self, json: &str) {
        std::fs::write(self.config_path(), json).expect("Failed to write config");
    }

    /// Run the CLI binary against this sandbox.
    pub fn run(&self, args: &[&str]) -> Output {
        run_cli(
            args,
            &self.config_path(),
            &self.data_dir(),
            &self.scryfall_url,
        )
    }

    /// Run the CLI and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}

/// Run the CLI binary with explicit config, data dir and card API URL.
pub fn run_cli(args: &[&str], config: &Path, data_dir: &Path, scryfall_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cardvault"));
    cmd.args(args);
    cmd.arg("--config").arg(config);
    cmd.arg("--data-dir").arg(data_dir);
    cmd.arg("--scryfall-url").arg(scryfall_url);
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}
