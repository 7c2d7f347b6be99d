//! Installed-tools report
//!
//! Probes every registry tool and renders the installed subset grouped
//! by category. Read-only: nothing here touches navigation state or the
//! system.

use colored::Colorize;
use comfy_table::{ContentArrangement, Table, presets::UTF8_BORDERS_ONLY};

use crate::models::ToolCategory;
use crate::probe::Prober;
use crate::runner::CommandRunner;

/// One installed tool row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledTool {
    pub label: String,
    pub version: Option<String>,
}

/// A category with at least one installed tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub label: String,
    pub tools: Vec<InstalledTool>,
}

/// Probe every tool in registry order and keep only the installed ones.
/// Categories with nothing installed are dropped entirely.
pub fn collect(runner: &dyn CommandRunner, categories: &[ToolCategory]) -> Vec<CategoryReport> {
    let prober = Prober::new(runner);
    categories
        .iter()
        .filter_map(|category| {
            let tools: Vec<InstalledTool> = category
                .tools
                .iter()
                .filter_map(|tool| {
                    let probe = prober.probe(tool);
                    probe.is_installed().then(|| InstalledTool {
                        label: tool.label.to_string(),
                        version: probe.version().map(String::from),
                    })
                })
                .collect();

            (!tools.is_empty()).then(|| CategoryReport {
                label: category.label.to_string(),
                tools,
            })
        })
        .collect()
}

/// Render the report to stdout, one table per category.
pub fn print_report(report: &[CategoryReport]) {
    if report.is_empty() {
        println!("{}", "No managed tools are currently installed.".yellow());
        return;
    }

    for category in report {
        println!("\n{}", category.label.bold().cyan());

        let mut table = Table::new();
        table
            .load_preset(UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Tool", "Version"]);

        for tool in &category.tools {
            table.add_row(vec![
                tool.label.clone(),
                tool.version.clone().unwrap_or_else(|| "unknown".to_string()),
            ]);
        }

        println!("{table}");
    }
}
