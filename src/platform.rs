//! Platform and package manager detection

use std::fmt;
use std::fs;

use crate::runner::CommandRunner;

/// The package managers the generic install pathway knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Brew,
}

impl PackageManager {
    /// Detection order on Linux mirrors how common each manager is;
    /// brew wins on macOS and is the fallback everywhere else.
    pub fn detect(runner: &dyn CommandRunner) -> Option<PackageManager> {
        if cfg!(target_os = "macos") && runner.resolve("brew") {
            return Some(PackageManager::Brew);
        }

        [
            PackageManager::Apt,
            PackageManager::Dnf,
            PackageManager::Yum,
            PackageManager::Pacman,
            PackageManager::Brew,
        ]
        .into_iter()
        .find(|pm| runner.resolve(pm.binary()))
    }

    pub fn from_name(name: &str) -> Option<PackageManager> {
        match name.to_lowercase().as_str() {
            "apt" | "apt-get" => Some(PackageManager::Apt),
            "dnf" => Some(PackageManager::Dnf),
            "yum" => Some(PackageManager::Yum),
            "pacman" => Some(PackageManager::Pacman),
            "brew" | "homebrew" => Some(PackageManager::Brew),
            _ => None,
        }
    }

    /// The executable this manager is invoked through.
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
            PackageManager::Brew => "brew",
        }
    }

    /// Whether this manager needs root to mutate the system.
    pub fn needs_sudo(&self) -> bool {
        !matches!(self, PackageManager::Brew)
    }

    /// Whether remove-with-configuration is a distinct operation here.
    /// Only apt draws the purge/remove line; everywhere else a purge
    /// request is surfaced as not supported rather than silently
    /// downgraded to remove.
    pub fn supports_purge(&self) -> bool {
        matches!(self, PackageManager::Apt)
    }

    pub fn install_args(&self, package: &str) -> Vec<String> {
        let args: Vec<&str> = match self {
            PackageManager::Apt => vec!["install", "-y", package],
            PackageManager::Dnf | PackageManager::Yum => vec!["install", "-y", package],
            PackageManager::Pacman => vec!["-S", "--noconfirm", package],
            PackageManager::Brew => vec!["install", package],
        };
        args.into_iter().map(String::from).collect()
    }

    pub fn remove_args(&self, package: &str, purge: bool) -> Vec<String> {
        let args: Vec<&str> = match self {
            PackageManager::Apt if purge => vec!["purge", "-y", package],
            PackageManager::Apt => vec!["remove", "-y", package],
            PackageManager::Dnf | PackageManager::Yum => vec!["remove", "-y", package],
            PackageManager::Pacman => vec!["-R", "--noconfirm", package],
            PackageManager::Brew => vec!["uninstall", package],
        };
        args.into_iter().map(String::from).collect()
    }

    pub fn update_args(&self, package: &str) -> Vec<String> {
        let args: Vec<&str> = match self {
            PackageManager::Apt => vec!["install", "-y", "--only-upgrade", package],
            PackageManager::Dnf | PackageManager::Yum => vec!["upgrade", "-y", package],
            PackageManager::Pacman => vec!["-S", "--noconfirm", package],
            PackageManager::Brew => vec!["upgrade", package],
        };
        args.into_iter().map(String::from).collect()
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PackageManager::Apt => "apt",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
            PackageManager::Brew => "Homebrew",
        };
        f.write_str(name)
    }
}

/// Where we are running. Shown in the session banner; WSL and plain
/// Linux behave the same otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Linux,
    Wsl,
    MacOs,
    Other,
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformKind::Linux => "Linux",
            PlatformKind::Wsl => "WSL2",
            PlatformKind::MacOs => "macOS",
            PlatformKind::Other => "unsupported",
        };
        f.write_str(name)
    }
}

pub fn detect_platform() -> PlatformKind {
    if cfg!(target_os = "macos") {
        PlatformKind::MacOs
    } else if cfg!(target_os = "linux") {
        if is_wsl() { PlatformKind::Wsl } else { PlatformKind::Linux }
    } else {
        PlatformKind::Other
    }
}

fn is_wsl() -> bool {
    fs::read_to_string("/proc/version")
        .map(|v| v.to_lowercase().contains("microsoft"))
        .unwrap_or(false)
}

/// Linux distribution id from /etc/os-release, if readable.
pub fn distro_id() -> Option<String> {
    let contents = fs::read_to_string("/etc/os-release").ok()?;
    contents
        .lines()
        .find_map(|line| line.strip_prefix("ID="))
        .map(|id| id.trim().trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandOutput;
    use anyhow::Result;

    struct OnlyPacman;

    impl CommandRunner for OnlyPacman {
        fn run(&self, _program: &str, _args: &[&str]) -> Result<CommandOutput> {
            Ok(CommandOutput::default())
        }

        fn resolve(&self, binary: &str) -> bool {
            binary == "pacman"
        }
    }

    struct Nothing;

    impl CommandRunner for Nothing {
        fn run(&self, _program: &str, _args: &[&str]) -> Result<CommandOutput> {
            Ok(CommandOutput::default())
        }

        fn resolve(&self, _binary: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_detect_finds_available_manager() {
        assert_eq!(
            PackageManager::detect(&OnlyPacman),
            Some(PackageManager::Pacman)
        );
    }

    #[test]
    fn test_detect_none_available() {
        assert_eq!(PackageManager::detect(&Nothing), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(PackageManager::from_name("apt"), Some(PackageManager::Apt));
        assert_eq!(
            PackageManager::from_name("Homebrew"),
            Some(PackageManager::Brew)
        );
        assert_eq!(PackageManager::from_name("snap"), None);
    }

    #[test]
    fn test_only_apt_supports_purge() {
        assert!(PackageManager::Apt.supports_purge());
        assert!(!PackageManager::Brew.supports_purge());
        assert!(!PackageManager::Pacman.supports_purge());
        assert!(!PackageManager::Dnf.supports_purge());
    }

    #[test]
    fn test_purge_args_only_differ_on_apt() {
        assert_eq!(
            PackageManager::Apt.remove_args("jq", true),
            vec!["purge", "-y", "jq"]
        );
        assert_eq!(
            PackageManager::Apt.remove_args("jq", false),
            vec!["remove", "-y", "jq"]
        );
    }

    #[test]
    fn test_brew_does_not_need_sudo() {
        assert!(!PackageManager::Brew.needs_sudo());
        assert!(PackageManager::Apt.needs_sudo());
    }
}
