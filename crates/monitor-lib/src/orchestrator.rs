//! Run orchestration
//!
//! Runs the synthesizers strictly in sequence: metric filters, alarms (after
//! notification target resolution), the dashboard, then saved queries. Item
//! failures are collected, never propagated. There is no rollback; a re-run
//! converges because every apply is create-or-replace by name.

use chrono::Utc;

use crate::context::RunContext;
use crate::models::MonitoringSpec;
use crate::notification;
use crate::report::{Reporter, RunReport, Section};
use crate::synth;

pub async fn run(ctx: &RunContext, spec: &MonitoringSpec, reporter: &mut dyn Reporter) -> RunReport {
    let started_at = Utc::now();
    ctx.logger.log_run_started(&ctx.region);
    reporter.run_started(&ctx.naming, &ctx.region);

    let mut items = Vec::new();

    reporter.section_started(Section::MetricFilters);
    if spec.log_monitoring.patterns.is_empty() {
        reporter.note("No log patterns configured");
    }
    items.extend(
        synth::synthesize_metric_filters(ctx, &spec.log_monitoring.patterns, reporter).await,
    );
    reporter.section_finished(Section::MetricFilters);

    reporter.section_started(Section::Alarms);
    if spec.alert_thresholds.is_empty() {
        reporter.note("No alert thresholds configured");
    }
    let target = notification::resolve(ctx, reporter).await;
    items.extend(synth::synthesize_alarms(ctx, &spec.alert_thresholds, &target, reporter).await);
    reporter.section_finished(Section::Alarms);

    reporter.section_started(Section::Dashboard);
    if spec.dashboard_widgets.is_empty() {
        reporter.note("No dashboard widgets configured; the dashboard will be empty");
    }
    items.push(synth::synthesize_dashboard(ctx, &spec.dashboard_widgets, reporter).await);
    reporter.section_finished(Section::Dashboard);

    reporter.section_started(Section::QueryDefinitions);
    items.extend(synth::synthesize_queries(ctx, reporter).await);
    reporter.section_finished(Section::QueryDefinitions);

    let report = RunReport {
        project_name: ctx.naming.project_name().to_string(),
        environment: ctx.naming.environment(),
        region: ctx.region.clone(),
        notification_target: target.reference().map(str::to_string),
        started_at,
        finished_at: Utc::now(),
        items,
    };

    ctx.logger
        .log_run_finished(report.applied_count(), report.failed_count());
    reporter.run_finished(&report);

    report
}
