//! Version probing
//!
//! Determines whether a tool is installed and, when it is, extracts a
//! human-readable version. Existence and version-parseability are
//! independent facts: a tool that resolves on PATH but prints something
//! we cannot parse is still reported as installed.

use regex::Regex;

use crate::models::{ToolDescriptor, VersionStrategy};
use crate::runner::CommandRunner;

/// Result of probing a single tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    NotInstalled,
    /// Installed; `None` means the version output was unparsable.
    Installed(Option<String>),
}

impl ProbeResult {
    pub fn is_installed(&self) -> bool {
        matches!(self, ProbeResult::Installed(_))
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            ProbeResult::Installed(Some(v)) => Some(v),
            _ => None,
        }
    }
}

/// Loose "first dotted-number token" pattern used by the generic
/// fallbacks. Requires at least one dot so a bare exit code or year
/// does not pass for a version.
const DOTTED_TOKEN: &str = r"(\d+(?:\.\d+)+)";

/// Flag sequence tried when a tool has no specific rule.
const GENERIC_FLAGS: [&str; 3] = ["--version", "-v", "-V"];

pub struct Prober<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Prober<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Probe one tool. Two probes without an intervening install or
    /// remove return the same result; nothing here mutates the system.
    pub fn probe(&self, tool: &ToolDescriptor) -> ProbeResult {
        if !self.runner.resolve(tool.binary()) {
            return ProbeResult::NotInstalled;
        }
        ProbeResult::Installed(self.extract_version(tool))
    }

    /// Run the tool's version rule, then the generic fallbacks.
    fn extract_version(&self, tool: &ToolDescriptor) -> Option<String> {
        if let VersionStrategy::Invocation { args, pattern } = tool.version
            && let Some(version) = self.try_invocation(tool.binary(), args, pattern)
        {
            return Some(version);
        }

        GENERIC_FLAGS
            .into_iter()
            .find_map(|flag| self.try_invocation(tool.binary(), &[flag], DOTTED_TOKEN))
    }

    fn try_invocation(&self, binary: &str, args: &[&str], pattern: &str) -> Option<String> {
        let output = self.runner.run(binary, args).ok()?;
        if !output.success() {
            return None;
        }
        // Some tools (java among them) print their version to stderr.
        let text = if output.stdout.trim().is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        extract(text, pattern)
    }
}

/// Apply a version pattern to command output. The first capture group is
/// the version; it is normalized before being returned.
fn extract(text: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    let caps = re.captures(text)?;
    caps.get(1).map(|m| canonical(m.as_str()))
}

/// Normalize an extracted token: strip a leading v/V and, where the
/// token is valid semver (padding "1.2" to "1.2.0" for the check),
/// return it in canonical form. Tokens semver cannot represent are kept
/// as extracted.
fn canonical(token: &str) -> String {
    let stripped = token
        .trim()
        .trim_start_matches(['v', 'V'])
        .to_string();

    let padded = match stripped.split('.').count() {
        1 => format!("{}.0.0", stripped),
        2 => format!("{}.0", stripped),
        _ => stripped.clone(),
    };

    match semver::Version::parse(&padded) {
        Ok(_) => stripped,
        Err(_) => token.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InstallMethod, VersionStrategy};
    use crate::runner::CommandOutput;
    use anyhow::Result;
    use std::collections::HashMap;

    /// Fake runner: a fixed set of resolvable binaries, each mapped from
    /// an invocation key "binary arg1 arg2" to canned output.
    struct FakeRunner {
        outputs: HashMap<String, CommandOutput>,
    }

    impl FakeRunner {
        fn new() -> Self {
            Self {
                outputs: HashMap::new(),
            }
        }

        fn with_output(mut self, invocation: &str, stdout: &str) -> Self {
            self.outputs.insert(
                invocation.to_string(),
                CommandOutput {
                    code: 0,
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                },
            );
            self
        }

        fn with_stderr_output(mut self, invocation: &str, stderr: &str) -> Self {
            self.outputs.insert(
                invocation.to_string(),
                CommandOutput {
                    code: 0,
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                },
            );
            self
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
            let key = std::iter::once(program)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" ");
            Ok(self
                .outputs
                .get(&key)
                .cloned()
                .unwrap_or(CommandOutput {
                    code: 1,
                    stdout: String::new(),
                    stderr: "unrecognized option".to_string(),
                }))
        }

        fn resolve(&self, binary: &str) -> bool {
            self.outputs.keys().any(|k| {
                k.split_whitespace().next() == Some(binary)
            })
        }
    }

    fn generic_tool(id: &'static str) -> ToolDescriptor {
        ToolDescriptor {
            id,
            label: id,
            binary: None,
            package: None,
            install: InstallMethod::System,
            version: VersionStrategy::Generic,
            supports_purge: true,
            remove_is_risky: false,
        }
    }

    #[test]
    fn test_not_on_path_is_not_installed() {
        let runner = FakeRunner::new();
        let prober = Prober::new(&runner);
        assert_eq!(
            prober.probe(&generic_tool("python3")),
            ProbeResult::NotInstalled
        );
    }

    #[test]
    fn test_generic_fallback_parses_version_line() {
        let runner =
            FakeRunner::new().with_output("mytool --version", "mytool version 2.3.1\n");
        let prober = Prober::new(&runner);
        assert_eq!(
            prober.probe(&generic_tool("mytool")),
            ProbeResult::Installed(Some("2.3.1".to_string()))
        );
    }

    #[test]
    fn test_generic_fallback_tries_short_flags() {
        // --version fails, -v succeeds
        let runner = FakeRunner::new().with_output("oldtool -v", "oldtool 0.9.2");
        let prober = Prober::new(&runner);
        assert_eq!(
            prober.probe(&generic_tool("oldtool")),
            ProbeResult::Installed(Some("0.9.2".to_string()))
        );
    }

    #[test]
    fn test_installed_but_unparsable_is_unknown() {
        let runner = FakeRunner::new().with_output("weird --version", "built from source\n");
        let prober = Prober::new(&runner);
        assert_eq!(
            prober.probe(&generic_tool("weird")),
            ProbeResult::Installed(None)
        );
    }

    #[test]
    fn test_specific_rule_slashed_format() {
        let tool = ToolDescriptor {
            id: "awscli",
            binary: Some("aws"),
            version: VersionStrategy::Invocation {
                args: &["--version"],
                pattern: r"aws-cli/(\d+(?:\.\d+)+)",
            },
            ..generic_tool("awscli")
        };
        let runner = FakeRunner::new()
            .with_output("aws --version", "aws-cli/2.15.0 Python/3.11.6 Linux/6.5\n");
        let prober = Prober::new(&runner);
        assert_eq!(
            prober.probe(&tool),
            ProbeResult::Installed(Some("2.15.0".to_string()))
        );
    }

    #[test]
    fn test_specific_rule_v_prefix() {
        let tool = ToolDescriptor {
            id: "nodejs",
            binary: Some("node"),
            version: VersionStrategy::Invocation {
                args: &["--version"],
                pattern: r"v(\d+(?:\.\d+)+)",
            },
            ..generic_tool("nodejs")
        };
        let runner = FakeRunner::new().with_output("node --version", "v20.10.0\n");
        let prober = Prober::new(&runner);
        assert_eq!(
            prober.probe(&tool),
            ProbeResult::Installed(Some("20.10.0".to_string()))
        );
    }

    #[test]
    fn test_specific_rule_quoted_stderr() {
        let tool = ToolDescriptor {
            id: "java",
            version: VersionStrategy::Invocation {
                args: &["-version"],
                pattern: r#""(\d+(?:\.\d+)+)""#,
            },
            ..generic_tool("java")
        };
        let runner = FakeRunner::new()
            .with_stderr_output("java -version", "openjdk version \"17.0.9\" 2023-10-17\n");
        let prober = Prober::new(&runner);
        assert_eq!(
            prober.probe(&tool),
            ProbeResult::Installed(Some("17.0.9".to_string()))
        );
    }

    #[test]
    fn test_specific_rule_falls_back_to_generic() {
        // The specific invocation produces nothing usable, but the
        // generic --version pathway still finds a dotted token.
        let tool = ToolDescriptor {
            version: VersionStrategy::Invocation {
                args: &["version", "--client"],
                pattern: r"v(\d+(?:\.\d+)+)",
            },
            ..generic_tool("kubectl")
        };
        let runner = FakeRunner::new()
            .with_output("kubectl version --client", "error: unknown flag")
            .with_output("kubectl --version", "kubectl 1.29.1");
        let prober = Prober::new(&runner);
        // canned output for "version --client" has code 0 but no match
        assert_eq!(
            prober.probe(&tool),
            ProbeResult::Installed(Some("1.29.1".to_string()))
        );
    }

    #[test]
    fn test_probe_is_idempotent() {
        let runner = FakeRunner::new().with_output("jq --version", "jq-1.7.1");
        let prober = Prober::new(&runner);
        let tool = generic_tool("jq");
        assert_eq!(prober.probe(&tool), prober.probe(&tool));
    }

    #[test]
    fn test_canonical_strips_v_prefix() {
        assert_eq!(canonical("v1.2.3"), "1.2.3");
        assert_eq!(canonical("V1.2.3"), "1.2.3");
        assert_eq!(canonical("1.2.3"), "1.2.3");
    }

    #[test]
    fn test_canonical_accepts_short_versions() {
        assert_eq!(canonical("1.2"), "1.2");
        assert_eq!(canonical("24.0"), "24.0");
    }

    #[test]
    fn test_canonical_keeps_unrepresentable_tokens() {
        // Four components are not semver; keep what was extracted.
        assert_eq!(canonical("1.2.3.4"), "1.2.3.4");
    }
}
