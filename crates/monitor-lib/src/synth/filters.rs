//! Log-derived metric filters

use crate::context::RunContext;
use crate::models::LogPatternRule;
use crate::naming::Naming;
use crate::report::{ItemOutcome, Reporter};
use crate::resources::{MetricFilterDefinition, MetricTransformation, ResourceKind};

use super::settle;

/// Metric filter for one pattern rule, scoped to `log_group`
pub fn metric_filter_definition(
    naming: &Naming,
    log_group: &str,
    rule: &LogPatternRule,
) -> MetricFilterDefinition {
    MetricFilterDefinition {
        log_group_name: log_group.to_string(),
        filter_name: naming.resource_name(&rule.name),
        filter_pattern: rule.pattern.clone(),
        metric_transformations: vec![MetricTransformation {
            metric_name: rule.metric_name.clone(),
            metric_namespace: naming.metric_namespace(),
            metric_value: rule.metric_value.clone(),
            default_value: 0.0,
        }],
    }
}

/// Apply a metric filter per rule, in document order
pub async fn synthesize_metric_filters(
    ctx: &RunContext,
    rules: &[LogPatternRule],
    reporter: &mut dyn Reporter,
) -> Vec<ItemOutcome> {
    let log_group = ctx.log_group();
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let filter = metric_filter_definition(&ctx.naming, &log_group, rule);
        let result = ctx
            .collaborators
            .metric_filters
            .put_metric_filter(&filter)
            .await;
        outcomes.push(settle(
            ctx,
            ResourceKind::MetricFilter,
            filter.filter_name,
            result,
            reporter,
        ));
    }

    outcomes
}
