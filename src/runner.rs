//! External command execution seam
//!
//! Everything that shells out (package managers, vendor installers,
//! version probes) goes through [`CommandRunner`], so the dispatcher and
//! probe can be exercised against a fake instead of a live system.

use anyhow::{Context, Result};
use std::process::Command;

/// Captured outcome of one external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// First non-empty line of stderr, falling back to stdout, for
    /// failure messages.
    pub fn error_line(&self) -> String {
        self.stderr
            .lines()
            .chain(self.stdout.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("no output")
            .to_string()
    }
}

pub trait CommandRunner {
    /// Run a program to completion and capture its output. `Err` means
    /// the program could not be spawned at all; a non-zero exit comes
    /// back as `Ok` with `code != 0`.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Whether an executable resolves on the search path.
    fn resolve(&self, binary: &str) -> bool;
}

/// The real thing: `std::process::Command` plus a PATH lookup.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to run {}", program))?;

        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn resolve(&self, binary: &str) -> bool {
        which::which(binary).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_line_prefers_stderr() {
        let out = CommandOutput {
            code: 1,
            stdout: "some stdout".to_string(),
            stderr: "E: Unable to locate package foo\n".to_string(),
        };
        assert_eq!(out.error_line(), "E: Unable to locate package foo");
    }

    #[test]
    fn test_error_line_falls_back_to_stdout() {
        let out = CommandOutput {
            code: 1,
            stdout: "\nonly stdout here\n".to_string(),
            stderr: String::new(),
        };
        assert_eq!(out.error_line(), "only stdout here");
    }

    #[test]
    fn test_error_line_empty_output() {
        let out = CommandOutput {
            code: 1,
            ..Default::default()
        };
        assert_eq!(out.error_line(), "no output");
    }

    #[test]
    fn test_system_runner_captures_exit_code() {
        let runner = SystemRunner;
        let out = runner.run("sh", &["-c", "exit 3"]).unwrap();
        assert_eq!(out.code, 3);
        assert!(!out.success());
    }

    #[test]
    fn test_system_runner_captures_stdout() {
        let runner = SystemRunner;
        let out = runner.run("sh", &["-c", "echo hello"]).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn test_system_runner_resolve() {
        let runner = SystemRunner;
        assert!(runner.resolve("sh"));
        assert!(!runner.resolve("definitely-not-a-real-binary-xyz"));
    }
}
