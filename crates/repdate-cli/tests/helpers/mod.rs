#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Reference date every harness command runs with unless overridden.
pub const TODAY: &str = "2024-02-01";

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("repdate").expect("Failed to find repdate binary");

        cmd.current_dir(self.temp_dir.path())
            .env("REPDATE_DATABASE_PATH", &self.db_path)
            .env("REPDATE_DISPLAY_TIMEZONE", "UTC")
            .env("REPDATE_TODAY", TODAY)
            .env_remove("REPDATE_LOG")
            .env_remove("RUST_LOG");

        cmd
    }

    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs a command and returns its stdout as a string
    pub fn stdout_of(&self, args: &[&str]) -> String {
        let output = self.run_success(args).get_output().stdout.clone();
        String::from_utf8(output).expect("stdout is not UTF-8")
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// First Monday of every month in the first half of 2024
    pub fn monthly_mondays_args(entry_id: &'static str) -> Vec<&'static str> {
        vec![
            "save", entry_id,
            "--start", "2024-01-01",
            "--end", "2024-06-30",
            "--mode", "months-by-weekday",
        ]
    }

    /// Every day from 2024-01-30 to 2024-02-10
    pub fn daily_args(entry_id: &'static str) -> Vec<&'static str> {
        vec![
            "save", entry_id,
            "--start", "2024-01-30",
            "--end", "2024-02-10",
            "--mode", "days",
        ]
    }
}
