use anyhow::{Result, ensure};
use clap::{Parser, Subcommand};
use colored::Colorize;

use toolshed::commands;
use toolshed::config::ToolshedConfig;
use toolshed::dispatch::Dispatcher;
use toolshed::menu::{ConsoleInput, Session};
use toolshed::platform::{self, PackageManager};
use toolshed::registry;
use toolshed::runner::SystemRunner;

#[derive(Parser)]
#[command(
    name = "toolshed",
    version,
    about = "Interactive manager for optional developer tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show installed tools grouped by category
    List,
    /// Check whether a tool is installed
    Check { tool: String },
    /// Show a tool's version
    Version { tool: String },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "✗".red(), err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match ToolshedConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {:#}, using defaults", "warning:".yellow(), err);
            ToolshedConfig::default()
        }
    };
    if !config.color {
        colored::control::set_override(false);
    }

    ensure!(
        !registry::categories().is_empty(),
        "tool registry is empty; nothing to manage"
    );

    let runner = SystemRunner;

    match cli.command {
        Some(Commands::List) => commands::cmd_list(&runner),
        Some(Commands::Check { tool }) => commands::cmd_check(&runner, &tool),
        Some(Commands::Version { tool }) => commands::cmd_version(&runner, &tool),
        None => interactive(&runner, config),
    }
}

fn interactive(runner: &SystemRunner, config: ToolshedConfig) -> Result<()> {
    let pm = config
        .package_manager_override()
        .or_else(|| PackageManager::detect(runner));

    print_banner(pm);

    let dispatcher = Dispatcher::new(runner, pm);
    let mut input = ConsoleInput;
    Session::new(registry::categories(), &dispatcher, runner, &mut input, config).run()
}

fn print_banner(pm: Option<PackageManager>) {
    let kind = platform::detect_platform();
    println!("{}", "toolshed — optional tool manager".bold());
    match platform::distro_id() {
        Some(distro) => println!("Platform: {} ({})", kind, distro),
        None => println!("Platform: {}", kind),
    }
    match pm {
        Some(pm) => println!("Package manager: {}", pm),
        // Reported once here; vendor-script tools still work without one.
        None => println!(
            "{} no supported package manager detected; only vendor-script installs will work",
            "warning:".yellow()
        ),
    }
}
