//! Observability for provisioning runs
//!
//! Provides:
//! - Prometheus counters and gauges describing a run, exportable in the text
//!   format for a node-exporter textfile collector
//! - Structured logging with tracing

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use tracing::{debug, info, warn};

use crate::error::{MonitorError, Result};
use crate::report::RunReport;
use crate::resources::ResourceKind;

/// Metrics describing one provisioning run
///
/// Held in a private registry: a run is a one-shot batch job and its metrics
/// are written out once at the end rather than scraped.
#[derive(Clone)]
pub struct RunMetrics {
    registry: Registry,
    resources_total: IntCounterVec,
    notification_target_resolved: IntGauge,
    last_run_timestamp_seconds: IntGauge,
}

impl RunMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let resources_total = IntCounterVec::new(
            Opts::new(
                "monitor_setup_resources_total",
                "Resources applied or failed during the run",
            ),
            &["kind", "outcome"],
        )
        .map_err(metrics_error)?;

        let notification_target_resolved = IntGauge::new(
            "monitor_setup_notification_target_resolved",
            "1 when alarms were wired to a notification target",
        )
        .map_err(metrics_error)?;

        let last_run_timestamp_seconds = IntGauge::new(
            "monitor_setup_last_run_timestamp_seconds",
            "Unix time the last run finished",
        )
        .map_err(metrics_error)?;

        registry
            .register(Box::new(resources_total.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(notification_target_resolved.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(last_run_timestamp_seconds.clone()))
            .map_err(metrics_error)?;

        Ok(Self {
            registry,
            resources_total,
            notification_target_resolved,
            last_run_timestamp_seconds,
        })
    }

    /// Fold a finished run into the metrics
    pub fn observe_report(&self, report: &RunReport) {
        for item in &report.items {
            let outcome = if item.is_applied() { "applied" } else { "failed" };
            self.resources_total
                .with_label_values(&[item.kind.as_str(), outcome])
                .inc();
        }
        self.notification_target_resolved
            .set(i64::from(report.notification_target.is_some()));
        self.last_run_timestamp_seconds
            .set(report.finished_at.timestamp());
    }

    pub fn resource_count(&self, kind: ResourceKind, outcome: &str) -> u64 {
        self.resources_total
            .with_label_values(&[kind.as_str(), outcome])
            .get()
    }

    /// Text exposition format of every metric in the run registry
    pub fn encode(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        String::from_utf8(buffer).map_err(|e| MonitorError::Metrics(e.to_string()))
    }
}

fn metrics_error(err: prometheus::Error) -> MonitorError {
    MonitorError::Metrics(err.to_string())
}

/// Structured logger for provisioning events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    prefix: String,
}

impl StructuredLogger {
    /// `prefix` is the `{project}-{environment}` pair being provisioned
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn log_run_started(&self, region: &str) {
        info!(
            event = "run_started",
            prefix = %self.prefix,
            region = %region,
            "Provisioning monitoring resources"
        );
    }

    pub fn log_resource_applied(&self, kind: ResourceKind, name: &str) {
        info!(
            event = "resource_applied",
            prefix = %self.prefix,
            kind = %kind.as_str(),
            name = %name,
            "Resource created or replaced"
        );
    }

    pub fn log_resource_failed(&self, kind: ResourceKind, name: &str, cause: &str) {
        warn!(
            event = "resource_failed",
            prefix = %self.prefix,
            kind = %kind.as_str(),
            name = %name,
            cause = %cause,
            "Resource apply failed, continuing"
        );
    }

    pub fn log_notification_target(&self, stack_name: &str, arn: Option<&str>) {
        match arn {
            Some(arn) => debug!(
                event = "notification_target_resolved",
                prefix = %self.prefix,
                stack = %stack_name,
                arn = %arn,
                "Resolved alarm notification target"
            ),
            None => warn!(
                event = "notification_target_unavailable",
                prefix = %self.prefix,
                stack = %stack_name,
                "Alarms will be created without notification actions"
            ),
        }
    }

    pub fn log_run_finished(&self, applied: usize, failed: usize) {
        if failed == 0 {
            info!(
                event = "run_finished",
                prefix = %self.prefix,
                applied = applied,
                failed = failed,
                "Monitoring setup completed"
            );
        } else {
            warn!(
                event = "run_finished",
                prefix = %self.prefix,
                applied = applied,
                failed = failed,
                "Monitoring setup completed with failures"
            );
        }
    }
}
