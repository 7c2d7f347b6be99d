//! Core data types shared across the registry, probe and dispatcher

use std::fmt;

/// How a tool's version string is obtained and parsed.
///
/// Most tools answer one of `--version`/`-v`/`-V` with something that
/// contains a dotted number, but the exceptions are numerous enough that
/// the registry carries a per-tool rule where the generic fallbacks fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStrategy {
    /// Try `--version`, `-v`, `-V` in order and extract the first
    /// dotted-number token from the output.
    Generic,
    /// Fixed invocation plus a regex whose first capture group is the
    /// version (e.g. `node --version` prints "v20.10.0", `aws --version`
    /// prints "aws-cli/2.15.0 Python/3.11").
    Invocation {
        args: &'static [&'static str],
        pattern: &'static str,
    },
}

/// Third-party apt repositories that need key and source-list setup
/// before the package manager can see the tool's package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorRepo {
    Docker,
    GithubCli,
    Kubernetes,
}

/// How a tool gets onto the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Plain OS package manager pathway (apt/dnf/yum/pacman/brew).
    System,
    /// OS package manager, but only after a vendor apt repository and
    /// signing key have been registered. Registration is idempotent.
    AptRepo(VendorRepo),
    /// Piped vendor install script. Updates are not supported in place;
    /// the tool must be reinstalled.
    VendorScript { url: &'static str },
}

/// Static description of one manageable tool.
///
/// The `id` doubles as the package name and, unless `binary` overrides
/// it, the executable name probed on PATH.
#[derive(Debug, Clone, Copy)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    /// Executable name when it differs from the id (e.g. "ripgrep"
    /// installs the binary "rg").
    pub binary: Option<&'static str>,
    /// Package name when it differs from the id (e.g. "java" in the menu,
    /// "default-jdk" on apt).
    pub package: Option<&'static str>,
    pub install: InstallMethod,
    pub version: VersionStrategy,
    pub supports_purge: bool,
    /// Tools that own large data directories (container images, cluster
    /// state). The menu offers plain remove only, never purge.
    pub remove_is_risky: bool,
}

impl ToolDescriptor {
    pub fn binary(&self) -> &'static str {
        self.binary.unwrap_or(self.id)
    }

    pub fn package(&self) -> &'static str {
        self.package.unwrap_or(self.id)
    }

    /// Whether the action menu should show a purge entry at all.
    pub fn offers_purge(&self) -> bool {
        self.supports_purge && !self.remove_is_risky
    }
}

/// A named group of tools shown together in the menu.
#[derive(Debug, Clone, Copy)]
pub struct ToolCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub tools: &'static [ToolDescriptor],
}

/// An action the user can run against a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Remove,
    Purge,
    Check,
    Version,
    Update,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Remove => "remove",
            Action::Purge => "purge",
            Action::Check => "check installed",
            Action::Version => "show version",
            Action::Update => "update",
        }
    }

    /// Destructive actions get a confirmation prompt when the config
    /// asks for one.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Action::Remove | Action::Purge)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a dispatched action. Consumed immediately to render the
/// post-action outcome line; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Success(String),
    Failure(String),
    /// The action makes no sense for this tool or platform (purge on a
    /// manager without purge semantics, update of a vendor-script tool).
    NotApplicable(String),
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: ToolDescriptor = ToolDescriptor {
        id: "jq",
        label: "jq",
        binary: None,
        package: None,
        install: InstallMethod::System,
        version: VersionStrategy::Generic,
        supports_purge: true,
        remove_is_risky: false,
    };

    #[test]
    fn test_binary_defaults_to_id() {
        assert_eq!(PLAIN.binary(), "jq");
        let rg = ToolDescriptor {
            id: "ripgrep",
            binary: Some("rg"),
            ..PLAIN
        };
        assert_eq!(rg.binary(), "rg");
    }

    #[test]
    fn test_package_defaults_to_id() {
        assert_eq!(PLAIN.package(), "jq");
        let java = ToolDescriptor {
            id: "java",
            package: Some("default-jdk"),
            ..PLAIN
        };
        assert_eq!(java.package(), "default-jdk");
    }

    #[test]
    fn test_risky_tools_never_offer_purge() {
        let docker = ToolDescriptor {
            supports_purge: true,
            remove_is_risky: true,
            ..PLAIN
        };
        assert!(!docker.offers_purge());
        assert!(PLAIN.offers_purge());
    }

    #[test]
    fn test_destructive_actions() {
        assert!(Action::Remove.is_destructive());
        assert!(Action::Purge.is_destructive());
        assert!(!Action::Install.is_destructive());
        assert!(!Action::Check.is_destructive());
    }
}
