use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Day every harness command runs on unless a test says otherwise.
pub const TODAY: &str = "20230315";

/// Test harness for running CLI commands against a temporary database
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("scheduler.db");

        Self { temp_dir, db_path }
    }

    /// A `cadence` command pointed at this harness's database, with
    /// `today` pinned to [`TODAY`].
    pub fn command(&self) -> Command {
        let mut cmd = self.unpinned_command();
        cmd.args(["--today", TODAY]);
        cmd
    }

    /// Like [`CliTestHarness::command`] but leaves `--today` to the test.
    pub fn unpinned_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");

        // Keep any cadence.toml in the developer's checkout out of the picture.
        cmd.current_dir(self.temp_dir.path());
        cmd.env("CADENCE_DATABASE_PATH", &self.db_path);
        cmd.env_remove("RUST_LOG");

        cmd
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs `show <id> --json` and returns the stored task.
    pub fn show_json(&self, id: &str) -> serde_json::Value {
        let output = self.run_success(&["show", id, "--json"]).get_output().stdout.clone();
        serde_json::from_slice(&output).expect("show --json did not print JSON")
    }
}

pub mod assertions {
    use predicates::prelude::*;

    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("Created task")
    }

    pub fn task_not_found() -> impl Predicate<str> {
        predicate::str::contains("not found")
    }
}
