//! Threshold alarms
//!
//! The alarm name is derived from `(metric, severity)`, which is also its
//! idempotency key: re-running replaces the same alarm in place.

use crate::context::RunContext;
use crate::models::{SeverityThresholds, ThresholdRule};
use crate::naming::Naming;
use crate::notification::NotificationTarget;
use crate::report::{ItemOutcome, Reporter};
use crate::resources::{AlarmDefinition, MetricUnit, ResourceKind, Statistic};

use super::settle;

pub fn alarm_description(severity: &str, metric: &str) -> String {
    format!("{}: {} threshold exceeded", severity.to_uppercase(), metric)
}

pub fn alarm_definition(
    naming: &Naming,
    severity: &str,
    rule: &ThresholdRule,
    target: &NotificationTarget,
) -> AlarmDefinition {
    AlarmDefinition {
        alarm_name: naming.alarm_name(&rule.metric, severity),
        alarm_description: alarm_description(severity, &rule.metric),
        comparison_operator: rule.comparison,
        evaluation_periods: rule.evaluation_periods,
        metric_name: rule.metric.clone(),
        namespace: naming.metric_namespace(),
        period: rule.period,
        statistic: Statistic::Sum,
        threshold: rule.threshold,
        actions_enabled: true,
        alarm_actions: target.alarm_actions(),
        unit: MetricUnit::Count,
    }
}

/// Apply an alarm per `(severity, rule)` pair, severity order then rule order
pub async fn synthesize_alarms(
    ctx: &RunContext,
    thresholds: &SeverityThresholds,
    target: &NotificationTarget,
    reporter: &mut dyn Reporter,
) -> Vec<ItemOutcome> {
    let mut outcomes = Vec::new();

    for (severity, rule) in thresholds.pairs() {
        let alarm = alarm_definition(&ctx.naming, severity, rule, target);
        let result = ctx.collaborators.alarms.put_metric_alarm(&alarm).await;
        outcomes.push(settle(
            ctx,
            ResourceKind::Alarm,
            alarm.alarm_name,
            result,
            reporter,
        ));
    }

    outcomes
}
