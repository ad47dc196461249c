//! Monitoring setup CLI
//!
//! Provisions the custom monitoring resources of one environment from the
//! monitoring document: metric filters, alarms, a dashboard and saved
//! Insights queries.

mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use monitor_lib::context::{DEFAULT_LOG_GROUP_ROOT, DEFAULT_PROJECT_NAME, DEFAULT_REGION};
use monitor_lib::{
    load_spec, AwsBackend, Collaborators, Environment, RecordingBackend, RunContext, RunMetrics,
    RunSettings, DEFAULT_CONFIG_FILE,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use output::{ConsoleReporter, OutputFormat};

/// Monitoring setup CLI
#[derive(Parser)]
#[command(name = "monitor-setup")]
#[command(author, version, about = "Custom monitoring setup for attendance management", long_about = None)]
pub struct Cli {
    /// Target environment
    #[arg(value_enum)]
    pub environment: EnvironmentArg,

    /// Project name used to namespace every resource
    #[arg(long, env = "MONITOR_PROJECT_NAME", default_value = DEFAULT_PROJECT_NAME)]
    pub project_name: String,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Monitoring document (YAML, TOML or JSON)
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Root of the environment's log group
    #[arg(long, default_value = DEFAULT_LOG_GROUP_ROOT)]
    pub log_group_root: String,

    /// Show what would be created without calling AWS
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: OutputFormat,

    /// Write run metrics in Prometheus text format to this file
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,

    /// Enable verbose logging on stderr
    #[arg(long, short)]
    pub verbose: bool,

    /// Log as JSON
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EnvironmentArg {
    Dev,
    Staging,
    Prod,
}

impl From<EnvironmentArg> for Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Dev => Environment::Dev,
            EnvironmentArg::Staging => Environment::Staging,
            EnvironmentArg::Prod => Environment::Prod,
        }
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the progress transcript; logs go to stderr
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    // Structural setup: any failure here aborts with a non-zero exit
    let spec = load_spec(&cli.config).context("Setup failed")?;

    let settings = RunSettings::new(cli.environment.into())
        .with_project_name(&cli.project_name)
        .with_region(&cli.region)
        .with_log_group_root(&cli.log_group_root);

    let recording = cli.dry_run.then(|| Arc::new(RecordingBackend::new()));
    let collaborators = match &recording {
        Some(backend) => Collaborators::from_backend(backend.clone()),
        None => Collaborators::from_backend(Arc::new(AwsBackend::connect(&settings.region).await)),
    };

    let ctx = RunContext::new(settings, collaborators);
    info!(prefix = %ctx.naming.prefix(), dry_run = cli.dry_run, "Monitoring setup configured");

    let mut reporter = ConsoleReporter::new(cli.format, cli.dry_run);
    let report = monitor_lib::run(&ctx, &spec, &mut reporter).await;

    let planned = match &recording {
        Some(backend) => Some(backend.calls().await),
        None => None,
    };
    output::print_summary(&report, planned.as_deref(), cli.format)?;

    if let Some(path) = &cli.metrics_file {
        let metrics = RunMetrics::new()?;
        metrics.observe_report(&report);
        std::fs::write(path, metrics.encode()?)
            .with_context(|| format!("Failed to write metrics file {}", path.display()))?;
    }

    Ok(())
}
