//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use monitor_lib::backend::RecordedCall;
use monitor_lib::report::dashboard_url;
use monitor_lib::resources::ResourceKind;
use monitor_lib::{ItemOutcome, Naming, Reporter, RunReport, Section};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Progress transcript (default)
    #[default]
    Table,
    /// JSON run report
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Streams run progress to stdout as `✓`/`✗` lines
///
/// Silent in JSON mode so stdout stays a single JSON document.
pub struct ConsoleReporter {
    format: OutputFormat,
    dry_run: bool,
    region: String,
}

impl ConsoleReporter {
    pub fn new(format: OutputFormat, dry_run: bool) -> Self {
        Self {
            format,
            dry_run,
            region: String::new(),
        }
    }

    fn enabled(&self) -> bool {
        matches!(self.format, OutputFormat::Table)
    }
}

impl Reporter for ConsoleReporter {
    fn run_started(&mut self, naming: &Naming, region: &str) {
        self.region = region.to_string();
        if !self.enabled() {
            return;
        }

        println!(
            "{}",
            format!("=== Setting up custom monitoring for {} ===", naming.prefix()).bold()
        );
        println!("Region: {}", region.cyan());
        if self.dry_run {
            self.note("Dry run: nothing will be changed in AWS");
        }
        println!();
    }

    fn section_started(&mut self, section: Section) {
        if self.enabled() {
            println!("{}", section.heading());
        }
    }

    fn item_finished(&mut self, item: &ItemOutcome) {
        if !self.enabled() {
            return;
        }

        match item.cause() {
            None => {
                let verb = if self.dry_run { "Planned" } else { "Created" };
                print_success(&format!("{} {}: {}", verb, item.kind, item.name));
                if item.kind == ResourceKind::Dashboard {
                    println!("  Dashboard URL: {}", dashboard_url(&self.region, &item.name));
                }
            }
            Some(cause) => {
                print_error(&format!("Failed to create {} {}: {}", item.kind, item.name, cause));
            }
        }
    }

    fn warning(&mut self, message: &str) {
        if self.enabled() {
            print_warning(&format!("Warning: {}", message));
        }
    }

    fn note(&mut self, message: &str) {
        if self.enabled() {
            print_info(message);
        }
    }

    fn section_finished(&mut self, _section: Section) {
        if self.enabled() {
            println!();
        }
    }

    fn run_finished(&mut self, report: &RunReport) {
        if !self.enabled() {
            return;
        }

        let failed = report.failed_count();
        if failed == 0 {
            println!(
                "{}",
                "=== Custom monitoring setup completed successfully! ==="
                    .green()
                    .bold()
            );
        } else {
            println!(
                "{}",
                format!(
                    "=== Custom monitoring setup completed with {} failed resource(s) ===",
                    failed
                )
                .yellow()
                .bold()
            );
        }
    }
}

/// Row for the dry-run plan table
#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    report: &'a RunReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    planned: Option<&'a [RecordedCall]>,
}

/// Print the end-of-run output: the plan table for dry runs, or the full
/// report in JSON mode
pub fn print_summary(
    report: &RunReport,
    planned: Option<&[RecordedCall]>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSummary { report, planned })?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let Some(calls) = planned else {
                return Ok(());
            };

            println!();
            println!("{}", "Planned resources".bold());
            let rows: Vec<PlanRow> = calls
                .iter()
                .map(|call| PlanRow {
                    kind: call.kind.to_string(),
                    name: call.name.clone(),
                    status: if call.accepted {
                        "ok".green().to_string()
                    } else {
                        "rejected".red().to_string()
                    },
                })
                .collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
