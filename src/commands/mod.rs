//! Non-interactive convenience commands

use anyhow::Result;
use colored::Colorize;

use crate::error::ToolshedError;
use crate::probe::{ProbeResult, Prober};
use crate::registry;
use crate::report;
use crate::runner::CommandRunner;

/// Print the installed-tools report and exit.
pub fn cmd_list(runner: &dyn CommandRunner) -> Result<()> {
    let collected = report::collect(runner, registry::categories());
    report::print_report(&collected);
    Ok(())
}

/// Report whether a single tool is installed.
pub fn cmd_check(runner: &dyn CommandRunner, name: &str) -> Result<()> {
    let tool = registry::find_tool(name)
        .ok_or_else(|| ToolshedError::ToolNotFound(name.to_string()))?;

    if runner.resolve(tool.binary()) {
        println!("{} {} is installed", "✓".green(), tool.label);
    } else {
        println!("{} {} is not installed", "✗".red(), tool.label);
    }
    Ok(())
}

/// Print a single tool's version, or say why we cannot.
pub fn cmd_version(runner: &dyn CommandRunner, name: &str) -> Result<()> {
    let tool = registry::find_tool(name)
        .ok_or_else(|| ToolshedError::ToolNotFound(name.to_string()))?;

    match Prober::new(runner).probe(tool) {
        ProbeResult::NotInstalled => {
            println!("{} {} is not installed", "✗".red(), tool.label);
        }
        ProbeResult::Installed(Some(version)) => {
            println!("{} {} {}", "✓".green(), tool.label, version.cyan());
        }
        ProbeResult::Installed(None) => {
            println!(
                "{} {}",
                "•".yellow(),
                ToolshedError::ProbeAmbiguous(tool.id.to_string())
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandOutput;

    struct NothingInstalled;

    impl CommandRunner for NothingInstalled {
        fn run(&self, _program: &str, _args: &[&str]) -> Result<CommandOutput> {
            Ok(CommandOutput {
                code: 1,
                stdout: String::new(),
                stderr: String::new(),
            })
        }

        fn resolve(&self, _binary: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_unknown_tool_is_an_error() {
        assert!(cmd_check(&NothingInstalled, "no-such-tool").is_err());
        assert!(cmd_version(&NothingInstalled, "no-such-tool").is_err());
    }

    #[test]
    fn test_known_tool_reports_cleanly() {
        assert!(cmd_check(&NothingInstalled, "jq").is_ok());
        assert!(cmd_version(&NothingInstalled, "jq").is_ok());
    }

    #[test]
    fn test_list_runs_without_error() {
        assert!(cmd_list(&NothingInstalled).is_ok());
    }
}
