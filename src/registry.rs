//! Static tool registry: categories, descriptors and version rules
//!
//! Adding a tool is a data change here, not a new branch in the
//! dispatcher. The dispatcher and probe read everything they need from
//! the descriptor.

use crate::models::{InstallMethod, ToolCategory, ToolDescriptor, VendorRepo, VersionStrategy};

const fn system_tool(id: &'static str, label: &'static str) -> ToolDescriptor {
    ToolDescriptor {
        id,
        label,
        binary: None,
        package: None,
        install: InstallMethod::System,
        version: VersionStrategy::Generic,
        supports_purge: true,
        remove_is_risky: false,
    }
}

static SHELL_TOOLS: [ToolDescriptor; 5] = [
    system_tool("zsh", "Zsh"),
    system_tool("tmux", "tmux"),
    ToolDescriptor {
        id: "starship",
        label: "Starship prompt",
        install: InstallMethod::VendorScript {
            url: "https://starship.rs/install.sh",
        },
        version: VersionStrategy::Invocation {
            args: &["--version"],
            pattern: r"starship (\d+(?:\.\d+)+)",
        },
        supports_purge: false,
        ..system_tool("starship", "")
    },
    ToolDescriptor {
        id: "oh-my-posh",
        label: "Oh My Posh",
        install: InstallMethod::VendorScript {
            url: "https://ohmyposh.dev/install.sh",
        },
        supports_purge: false,
        ..system_tool("oh-my-posh", "")
    },
    system_tool("fzf", "fzf"),
];

static CONTAINER_TOOLS: [ToolDescriptor; 3] = [
    ToolDescriptor {
        id: "docker",
        label: "Docker Engine",
        package: Some("docker-ce"),
        install: InstallMethod::AptRepo(VendorRepo::Docker),
        version: VersionStrategy::Invocation {
            args: &["--version"],
            pattern: r"Docker version (\d+(?:\.\d+)+)",
        },
        // Removing docker-ce leaves images and volumes behind; purging
        // them is a data-loss hazard the menu does not offer.
        remove_is_risky: true,
        ..system_tool("docker", "")
    },
    ToolDescriptor {
        id: "kubectl",
        label: "kubectl",
        install: InstallMethod::AptRepo(VendorRepo::Kubernetes),
        version: VersionStrategy::Invocation {
            args: &["version", "--client"],
            pattern: r"v(\d+(?:\.\d+)+)",
        },
        ..system_tool("kubectl", "")
    },
    system_tool("helm", "Helm"),
];

static LANGUAGE_TOOLS: [ToolDescriptor; 5] = [
    system_tool("python3", "Python 3"),
    ToolDescriptor {
        id: "nodejs",
        label: "Node.js",
        binary: Some("node"),
        version: VersionStrategy::Invocation {
            args: &["--version"],
            pattern: r"v(\d+(?:\.\d+)+)",
        },
        ..system_tool("nodejs", "")
    },
    ToolDescriptor {
        id: "golang",
        label: "Go",
        binary: Some("go"),
        version: VersionStrategy::Invocation {
            args: &["version"],
            pattern: r"go(\d+(?:\.\d+)+)",
        },
        ..system_tool("golang", "")
    },
    ToolDescriptor {
        id: "java",
        label: "Java (OpenJDK)",
        package: Some("default-jdk"),
        // `java -version` prints to stderr with the version in quotes:
        //   openjdk version "17.0.9" 2023-10-17
        version: VersionStrategy::Invocation {
            args: &["-version"],
            pattern: r#""(\d+(?:\.\d+)+)""#,
        },
        ..system_tool("java", "")
    },
    ToolDescriptor {
        id: "rustup",
        label: "Rust toolchain (rustup)",
        install: InstallMethod::VendorScript {
            url: "https://sh.rustup.rs",
        },
        supports_purge: false,
        ..system_tool("rustup", "")
    },
];

static CLOUD_TOOLS: [ToolDescriptor; 3] = [
    ToolDescriptor {
        id: "awscli",
        label: "AWS CLI",
        binary: Some("aws"),
        version: VersionStrategy::Invocation {
            args: &["--version"],
            pattern: r"aws-cli/(\d+(?:\.\d+)+)",
        },
        ..system_tool("awscli", "")
    },
    ToolDescriptor {
        id: "gh",
        label: "GitHub CLI",
        install: InstallMethod::AptRepo(VendorRepo::GithubCli),
        version: VersionStrategy::Invocation {
            args: &["--version"],
            pattern: r"gh version (\d+(?:\.\d+)+)",
        },
        ..system_tool("gh", "")
    },
    system_tool("terraform", "Terraform"),
];

static NETWORK_TOOLS: [ToolDescriptor; 4] = [
    system_tool("curl", "curl"),
    system_tool("wget", "wget"),
    system_tool("nmap", "Nmap"),
    ToolDescriptor {
        id: "net-tools",
        label: "net-tools (ifconfig)",
        binary: Some("ifconfig"),
        ..system_tool("net-tools", "")
    },
];

static UTILITY_TOOLS: [ToolDescriptor; 4] = [
    system_tool("jq", "jq"),
    ToolDescriptor {
        id: "ripgrep",
        label: "ripgrep",
        binary: Some("rg"),
        ..system_tool("ripgrep", "")
    },
    system_tool("htop", "htop"),
    system_tool("tree", "tree"),
];

static CATEGORIES: [ToolCategory; 6] = [
    ToolCategory {
        id: "shell",
        label: "Shell & Prompt",
        tools: &SHELL_TOOLS,
    },
    ToolCategory {
        id: "containers",
        label: "Containers & Kubernetes",
        tools: &CONTAINER_TOOLS,
    },
    ToolCategory {
        id: "languages",
        label: "Programming Tools",
        tools: &LANGUAGE_TOOLS,
    },
    ToolCategory {
        id: "cloud",
        label: "Cloud CLIs",
        tools: &CLOUD_TOOLS,
    },
    ToolCategory {
        id: "network",
        label: "Network Tools",
        tools: &NETWORK_TOOLS,
    },
    ToolCategory {
        id: "utilities",
        label: "Utilities",
        tools: &UTILITY_TOOLS,
    },
];

/// All categories in display order.
pub fn categories() -> &'static [ToolCategory] {
    &CATEGORIES
}

/// Look up a tool by id across every category.
pub fn find_tool(id: &str) -> Option<&'static ToolDescriptor> {
    CATEGORIES
        .iter()
        .flat_map(|c| c.tools.iter())
        .find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_not_empty() {
        assert!(!categories().is_empty());
        for category in categories() {
            assert!(!category.tools.is_empty(), "empty category {}", category.id);
        }
    }

    #[test]
    fn test_tool_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for category in categories() {
            for tool in category.tools {
                assert!(seen.insert(tool.id), "duplicate tool id {}", tool.id);
            }
        }
    }

    #[test]
    fn test_find_tool() {
        assert!(find_tool("docker").is_some());
        assert!(find_tool("python3").is_some());
        assert!(find_tool("no-such-tool").is_none());
    }

    #[test]
    fn test_risky_tools_do_not_offer_purge() {
        let docker = find_tool("docker").unwrap();
        assert!(docker.remove_is_risky);
        assert!(!docker.offers_purge());
    }

    #[test]
    fn test_vendor_script_tools_do_not_support_purge() {
        for id in ["starship", "oh-my-posh", "rustup"] {
            let tool = find_tool(id).unwrap();
            assert!(!tool.supports_purge, "{} should not support purge", id);
        }
    }

    #[test]
    fn test_labels_are_filled_in() {
        for category in categories() {
            for tool in category.tools {
                assert!(!tool.label.is_empty(), "tool {} has no label", tool.id);
            }
        }
    }
}
