//! Isolated test environment for running the doxytag binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Result of running a doxytag CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as JSON lines
    pub fn json_events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad JSON line {l:?}: {e}")))
            .collect()
    }
}

/// Temp workspace: `TestDir/` for sources, `home/` for the user config
/// directory, and the workspace root as the working directory.
pub struct TestEnv {
    pub root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir_all(root.path().join("TestDir")).expect("Failed to create TestDir");
        std::fs::create_dir_all(root.path().join("home")).expect("Failed to create home");
        Self {
            root,
            bin: PathBuf::from(env!("CARGO_BIN_EXE_doxytag")),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.path("TestDir")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path("doxygenFiles")
    }

    /// Write a file into the source directory
    pub fn write_source(&self, name: &str, content: &str) {
        std::fs::write(self.source_dir().join(name), content).expect("Failed to write source");
    }

    /// Write a file relative to the workspace root
    pub fn write_file(&self, relative: &str, content: &str) {
        let full = self.path(relative);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full, content).expect("Failed to write file");
    }

    pub fn read_output(&self, name: &str) -> String {
        let full = self.output_dir().join(name);
        std::fs::read_to_string(&full)
            .unwrap_or_else(|e| panic!("Failed to read output {}: {}", full.display(), e))
    }

    pub fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.output_dir()) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    /// Run doxytag with the workspace root as cwd
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.run_from_with_env(self.root.path(), args, env_vars)
    }

    pub fn run_from_with_env(
        &self,
        cwd: &Path,
        args: &[&str],
        env_vars: &[(&str, &str)],
    ) -> TestResult {
        let home = self.path("home");
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(cwd)
            .args(args)
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env_remove("RUST_LOG")
            .env_remove("DOXYTAG_SOURCE")
            .env_remove("DOXYTAG_OUTPUT")
            .env_remove("DOXYTAG_INCLUDE")
            .env_remove("DOXYTAG_EXCLUDE")
            .env_remove("DOXYTAG_SUFFIX")
            .env_remove("DOXYTAG_LINE_ENDING");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute doxytag");
        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
