//! Action dispatch
//!
//! Takes a tool descriptor plus an action and performs it, either
//! through a special-cased installer (vendor apt repository, piped
//! vendor script) or the generic package-manager pathway. Every failure
//! comes back as an [`ActionResult`]; the session keeps running.

use std::cell::Cell;

use anyhow::Result;

use crate::error::ToolshedError;
use crate::models::{Action, ActionResult, InstallMethod, ToolDescriptor, VendorRepo};
use crate::platform::PackageManager;
use crate::probe::Prober;
use crate::runner::{CommandOutput, CommandRunner};

/// Seam for the navigation engine; lets session tests swap in a stub
/// that records calls instead of touching the system.
pub trait Dispatch {
    fn dispatch(&self, tool: &ToolDescriptor, action: Action) -> ActionResult;
}

/// Everything needed to register a vendor apt repository: signing key,
/// source list entry and the packages it provides. Registration is safe
/// to re-run; key and list writes simply overwrite their previous state.
struct RepoSpec {
    key_url: &'static str,
    key_path: &'static str,
    repo_line: &'static str,
    list_path: &'static str,
    packages: &'static [&'static str],
}

fn repo_spec(repo: VendorRepo) -> RepoSpec {
    match repo {
        VendorRepo::Docker => RepoSpec {
            key_url: "https://download.docker.com/linux/ubuntu/gpg",
            key_path: "/etc/apt/keyrings/docker.gpg",
            repo_line: "deb [signed-by=/etc/apt/keyrings/docker.gpg] https://download.docker.com/linux/ubuntu stable",
            list_path: "/etc/apt/sources.list.d/docker.list",
            packages: &["docker-ce", "docker-ce-cli", "containerd.io"],
        },
        VendorRepo::GithubCli => RepoSpec {
            key_url: "https://cli.github.com/packages/githubcli-archive-keyring.gpg",
            key_path: "/etc/apt/keyrings/githubcli-archive-keyring.gpg",
            repo_line: "deb [signed-by=/etc/apt/keyrings/githubcli-archive-keyring.gpg] https://cli.github.com/packages stable main",
            list_path: "/etc/apt/sources.list.d/github-cli.list",
            packages: &["gh"],
        },
        VendorRepo::Kubernetes => RepoSpec {
            key_url: "https://pkgs.k8s.io/core:/stable:/v1.29/deb/Release.key",
            key_path: "/etc/apt/keyrings/kubernetes-apt-keyring.gpg",
            repo_line: "deb [signed-by=/etc/apt/keyrings/kubernetes-apt-keyring.gpg] https://pkgs.k8s.io/core:/stable:/v1.29/deb/ /",
            list_path: "/etc/apt/sources.list.d/kubernetes.list",
            packages: &["kubectl"],
        },
    }
}

pub struct Dispatcher<'a> {
    runner: &'a dyn CommandRunner,
    pm: Option<PackageManager>,
    /// apt indexes are refreshed once per session, before the first
    /// install that needs them.
    apt_refreshed: Cell<bool>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(runner: &'a dyn CommandRunner, pm: Option<PackageManager>) -> Self {
        Self {
            runner,
            pm,
            apt_refreshed: Cell::new(false),
        }
    }

    pub fn package_manager(&self) -> Option<PackageManager> {
        self.pm
    }

    fn prober(&self) -> Prober<'_> {
        Prober::new(self.runner)
    }

    fn pm_or_unavailable(&self) -> Result<PackageManager, ActionResult> {
        self.pm.ok_or_else(|| {
            ActionResult::Failure(ToolshedError::PackageManagerUnavailable.to_string())
        })
    }

    /// Run a package-manager invocation, with sudo where the manager
    /// needs it.
    fn run_pm(&self, pm: PackageManager, args: &[String]) -> Result<CommandOutput> {
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        if pm.needs_sudo() {
            let mut sudo_args = vec![pm.binary()];
            sudo_args.extend(arg_refs);
            self.runner.run("sudo", &sudo_args)
        } else {
            self.runner.run(pm.binary(), &arg_refs)
        }
    }

    fn refresh_apt_index(&self, pm: PackageManager) {
        if pm != PackageManager::Apt || self.apt_refreshed.get() {
            return;
        }
        self.apt_refreshed.set(true);
        // A failed refresh is a warning, not a failure; stale indexes
        // still often resolve the requested package.
        match self.run_pm(pm, &["update".to_string()]) {
            Ok(out) if out.success() => {}
            _ => eprintln!("warning: apt index refresh failed, continuing with stale indexes"),
        }
    }

    fn install(&self, tool: &ToolDescriptor) -> ActionResult {
        // Idempotent: an already-present tool is a successful no-op.
        // Presence alone decides this; no version probe is needed.
        if self.runner.resolve(tool.binary()) {
            return ActionResult::Success(format!("{} is already installed", tool.label));
        }

        match tool.install {
            InstallMethod::System => self.install_via_pm(tool, &[tool.package()]),
            InstallMethod::AptRepo(repo) => self.install_via_repo(tool, repo),
            InstallMethod::VendorScript { url } => self.install_via_script(tool, url),
        }
    }

    fn install_via_pm(&self, tool: &ToolDescriptor, packages: &[&str]) -> ActionResult {
        let pm = match self.pm_or_unavailable() {
            Ok(pm) => pm,
            Err(failure) => return failure,
        };
        self.refresh_apt_index(pm);

        for package in packages {
            let outcome = self.run_pm(pm, &pm.install_args(package));
            if let Err(failure) = self.expect_success(tool, outcome, Action::Install) {
                return failure;
            }
        }
        ActionResult::Success(format!("{} installed via {}", tool.label, pm))
    }

    fn install_via_repo(&self, tool: &ToolDescriptor, repo: VendorRepo) -> ActionResult {
        let pm = match self.pm_or_unavailable() {
            Ok(pm) => pm,
            Err(failure) => return failure,
        };
        // The repository dance is apt-specific; brew and the rpm-family
        // managers carry these tools in their own trees, under the
        // tool's own name rather than the apt package name.
        if pm != PackageManager::Apt {
            return self.install_via_pm(tool, &[tool.id]);
        }

        let spec = repo_spec(repo);
        if let Err(failure) = self.register_apt_repo(tool, &spec) {
            return failure;
        }
        // Force a re-read so the freshly registered repo is visible.
        self.apt_refreshed.set(false);
        self.install_via_pm(tool, spec.packages)
    }

    /// Download the signing key and write the source list. Both steps
    /// overwrite prior state, so registering twice is harmless.
    fn register_apt_repo(
        &self,
        tool: &ToolDescriptor,
        spec: &RepoSpec,
    ) -> Result<(), ActionResult> {
        let steps = [
            "install -m 0755 -d /etc/apt/keyrings".to_string(),
            format!(
                "curl -fsSL {} | gpg --dearmor --yes -o {}",
                spec.key_url, spec.key_path
            ),
            format!("echo '{}' > {}", spec.repo_line, spec.list_path),
        ];
        for step in &steps {
            let outcome = self.runner.run("sudo", &["sh", "-c", step.as_str()]);
            self.expect_success(tool, outcome, Action::Install)?;
        }
        Ok(())
    }

    fn install_via_script(&self, tool: &ToolDescriptor, url: &str) -> ActionResult {
        let pipeline = format!("curl -fsSL {} | sh", url);
        let outcome = self.runner.run("sh", &["-c", &pipeline]);
        match self.expect_success(tool, outcome, Action::Install) {
            Ok(()) => ActionResult::Success(format!("{} installed via vendor script", tool.label)),
            Err(failure) => failure,
        }
    }

    fn remove(&self, tool: &ToolDescriptor, purge: bool) -> ActionResult {
        if !self.runner.resolve(tool.binary()) {
            return ActionResult::NotApplicable(format!("{} is not installed", tool.label));
        }

        if let InstallMethod::VendorScript { .. } = tool.install {
            return ActionResult::NotApplicable(format!(
                "{} was installed by a vendor script; remove it with the vendor's uninstaller",
                tool.label
            ));
        }

        let pm = match self.pm_or_unavailable() {
            Ok(pm) => pm,
            Err(failure) => return failure,
        };

        if purge && !pm.supports_purge() {
            return ActionResult::NotApplicable(format!(
                "{} does not distinguish purge from remove; use remove instead",
                pm
            ));
        }

        let outcome = self.run_pm(pm, &pm.remove_args(tool.package(), purge));
        match self.expect_success(tool, outcome, Action::Remove) {
            Ok(()) => {
                let verb = if purge { "purged" } else { "removed" };
                ActionResult::Success(format!("{} {}", tool.label, verb))
            }
            Err(failure) => failure,
        }
    }

    fn update(&self, tool: &ToolDescriptor) -> ActionResult {
        if !self.runner.resolve(tool.binary()) {
            return ActionResult::NotApplicable(format!("{} is not installed", tool.label));
        }

        if let InstallMethod::VendorScript { .. } = tool.install {
            return ActionResult::NotApplicable(format!(
                "{} does not update in place; reinstall to update",
                tool.label
            ));
        }

        let pm = match self.pm_or_unavailable() {
            Ok(pm) => pm,
            Err(failure) => return failure,
        };
        self.refresh_apt_index(pm);

        let outcome = self.run_pm(pm, &pm.update_args(tool.package()));
        match self.expect_success(tool, outcome, Action::Update) {
            Ok(()) => ActionResult::Success(format!("{} updated via {}", tool.label, pm)),
            Err(failure) => failure,
        }
    }

    fn check(&self, tool: &ToolDescriptor) -> ActionResult {
        if self.runner.resolve(tool.binary()) {
            ActionResult::Success(format!("{} is installed", tool.label))
        } else {
            ActionResult::Success(format!("{} is not installed", tool.label))
        }
    }

    fn version(&self, tool: &ToolDescriptor) -> ActionResult {
        match self.prober().probe(tool) {
            crate::probe::ProbeResult::NotInstalled => {
                ActionResult::Failure(format!("{} is not installed", tool.label))
            }
            crate::probe::ProbeResult::Installed(Some(version)) => {
                ActionResult::Success(format!("{} {}", tool.label, version))
            }
            crate::probe::ProbeResult::Installed(None) => ActionResult::Success(format!(
                "{} (version unknown: {})",
                tool.label,
                ToolshedError::ProbeAmbiguous(tool.id.to_string())
            )),
        }
    }

    /// Fold a command outcome into the error taxonomy for install-like
    /// and remove-like actions.
    fn expect_success(
        &self,
        tool: &ToolDescriptor,
        outcome: Result<CommandOutput>,
        action: Action,
    ) -> Result<(), ActionResult> {
        let reason = match outcome {
            Ok(out) if out.success() => return Ok(()),
            Ok(out) => out.error_line(),
            Err(err) => err.to_string(),
        };
        let err = match action {
            Action::Remove | Action::Purge => ToolshedError::RemoveFailed {
                tool: tool.id.to_string(),
                reason,
            },
            _ => ToolshedError::InstallFailed {
                tool: tool.id.to_string(),
                reason,
            },
        };
        Err(ActionResult::Failure(err.to_string()))
    }
}

impl Dispatch for Dispatcher<'_> {
    fn dispatch(&self, tool: &ToolDescriptor, action: Action) -> ActionResult {
        match action {
            Action::Install => self.install(tool),
            Action::Remove => self.remove(tool, false),
            Action::Purge => self.remove(tool, true),
            Action::Check => self.check(tool),
            Action::Version => self.version(tool),
            Action::Update => self.update(tool),
        }
    }
}
