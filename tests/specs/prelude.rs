//! Test helpers for `kiractl` behavioral specifications.
//!
//! Black-box: every spec invokes the built `kiractl` binary and asserts on
//! stdout/stderr/exit code, the way `oj`'s CLI specs drive `oj` rather than
//! calling into its crates directly.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use assert_cmd::cargo::CommandCargoExt;

/// Returns a `Command` for the `kiractl` binary under test.
fn kiractl_cmd() -> Command {
    Command::cargo_bin("kiractl").expect("kiractl binary should be built by cargo test")
}

/// Fluent builder for one `kiractl` invocation.
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

impl CliBuilder {
    fn new() -> Self {
        Self { args: Vec::new(), dir: None, envs: Vec::new() }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((key.to_string(), value.as_ref().to_string_lossy().to_string()));
        self
    }

    fn command(self) -> Command {
        let mut cmd = kiractl_cmd();
        cmd.args(&self.args);
        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }
        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    pub fn run(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("kiractl should spawn");
        RunAssert { output }
    }

    pub fn passes(self) -> RunAssert {
        let result = self.run();
        assert!(
            result.output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            result.output.status.code(),
            result.stdout(),
            result.stderr()
        );
        result
    }

    pub fn fails(self) -> RunAssert {
        let result = self.run();
        assert!(
            !result.output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            result.stdout(),
            result.stderr()
        );
        result
    }
}

/// Result of a `kiractl` run, for chaining assertions.
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn code_is(self, expected: i32) -> Self {
        assert_eq!(self.output.status.code(), Some(expected), "exit code mismatch\nstdout: {}\nstderr: {}", self.stdout(), self.stderr());
        self
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(unexpected), "stdout should not contain '{unexpected}'\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{expected}'\nstderr: {stderr}");
        self
    }

    /// Parses stdout as the `--json` envelope and returns the whole value.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap_or_else(|err| {
            panic!("stdout is not valid JSON ({err})\nstdout: {}", self.stdout())
        })
    }

    /// Returns `data.<pointer>` from a successful `--json` envelope.
    /// An empty `pointer` returns the whole `data` object.
    pub fn json_data(&self, pointer: &str) -> serde_json::Value {
        let value = self.json();
        let pointer = if pointer.is_empty() { "/data".to_string() } else { format!("/data/{pointer}") };
        value.pointer(&pointer).cloned().unwrap_or_else(|| {
            panic!("missing JSON pointer {pointer} in {value}")
        })
    }
}

/// A throwaway vault + cwd for one test, so tests never touch the real
/// `~/.kira` vault or `<cwd>/artifacts` audit directory.
pub struct Project {
    root: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { root: tempfile::tempdir().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn vault_path(&self) -> PathBuf {
        self.root.path().join("vault")
    }

    /// A `kiractl` invocation rooted at this project: `--vault` points at
    /// an isolated directory and the process cwd is the project root, so
    /// `<cwd>/artifacts/audit` lands inside the tempdir.
    pub fn kiractl(&self) -> CliBuilder {
        cli().pwd(self.path()).args(&["--vault", &self.vault_path().to_string_lossy()])
    }

    /// Writes a file relative to the project root (parent dirs created).
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.root.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(full_path, content).expect("write project file");
    }

    pub fn audit_dir(&self) -> PathBuf {
        self.path().join("artifacts").join("audit")
    }

    /// Reads every line of today's audit log (if any) as parsed JSON.
    pub fn audit_lines(&self) -> Vec<serde_json::Value> {
        let dir = self.audit_dir();
        let Ok(entries) = std::fs::read_dir(&dir) else { return Vec::new() };
        let mut lines = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
                continue;
            }
            let text = std::fs::read_to_string(&path).unwrap_or_default();
            for line in text.lines() {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(line) {
                    lines.push(value);
                }
            }
        }
        lines
    }
}

pub fn task_count_in_vault(project: &Project) -> usize {
    let tasks_dir = project.vault_path().join("tasks");
    match std::fs::read_dir(&tasks_dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().and_then(|e| e.to_str()) == Some("md"))
            .count(),
        Err(_) => 0,
    }
}
