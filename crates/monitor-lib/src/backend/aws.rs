//! AWS backend: CloudWatch, CloudWatch Logs and CloudFormation clients
//!
//! Credentials and region resolution are left to the SDK's default chain;
//! only the region can be overridden. Transport retries are the SDK's own.

use aws_sdk_cloudformation as cloudformation;
use aws_sdk_cloudwatch as cloudwatch;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use tracing::debug;

use super::{
    async_trait, AlarmApi, DashboardApi, MetricFilterApi, QueryDefinitionApi, StackOutputApi,
};
use crate::error::{MonitorError, Result};
use crate::resources::{
    AlarmDefinition, DashboardDefinition, MetricFilterDefinition, MetricUnit, QueryDefinition,
    Statistic,
};

/// Provider clients for one region
#[derive(Clone)]
pub struct AwsBackend {
    cloudwatch: cloudwatch::Client,
    logs: cloudwatchlogs::Client,
    cloudformation: cloudformation::Client,
}

impl AwsBackend {
    /// Build clients for `region` from the default credential chain
    pub async fn connect(region: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(cloudwatch::config::Region::new(region.to_string()))
            .load()
            .await;

        debug!(region = %region, "AWS clients configured");
        Self::from_sdk_config(&sdk_config)
    }

    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            cloudwatch: cloudwatch::Client::new(sdk_config),
            logs: cloudwatchlogs::Client::new(sdk_config),
            cloudformation: cloudformation::Client::new(sdk_config),
        }
    }
}

fn remote_error<E: std::error::Error>(operation: &'static str, err: E) -> MonitorError {
    MonitorError::remote(operation, DisplayErrorContext(err).to_string())
}

fn to_i32(operation: &'static str, field: &str, value: u32) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| MonitorError::remote(operation, format!("{} {} out of range", field, value)))
}

#[async_trait]
impl MetricFilterApi for AwsBackend {
    async fn put_metric_filter(&self, filter: &MetricFilterDefinition) -> Result<()> {
        let transformations = filter
            .metric_transformations
            .iter()
            .map(|t| {
                cloudwatchlogs::types::MetricTransformation::builder()
                    .metric_name(&t.metric_name)
                    .metric_namespace(&t.metric_namespace)
                    .metric_value(&t.metric_value)
                    .default_value(t.default_value)
                    .build()
                    .map_err(|e| remote_error("PutMetricFilter", e))
            })
            .collect::<Result<Vec<_>>>()?;

        self.logs
            .put_metric_filter()
            .log_group_name(&filter.log_group_name)
            .filter_name(&filter.filter_name)
            .filter_pattern(&filter.filter_pattern)
            .set_metric_transformations(Some(transformations))
            .send()
            .await
            .map_err(|e| remote_error("PutMetricFilter", e))?;

        Ok(())
    }
}

#[async_trait]
impl AlarmApi for AwsBackend {
    async fn put_metric_alarm(&self, alarm: &AlarmDefinition) -> Result<()> {
        let statistic = match alarm.statistic {
            Statistic::Sum => cloudwatch::types::Statistic::Sum,
        };
        let unit = match alarm.unit {
            MetricUnit::Count => cloudwatch::types::StandardUnit::Count,
        };

        self.cloudwatch
            .put_metric_alarm()
            .alarm_name(&alarm.alarm_name)
            .alarm_description(&alarm.alarm_description)
            .comparison_operator(cloudwatch::types::ComparisonOperator::from(
                alarm.comparison_operator.as_str(),
            ))
            .evaluation_periods(to_i32(
                "PutMetricAlarm",
                "evaluation_periods",
                alarm.evaluation_periods,
            )?)
            .metric_name(&alarm.metric_name)
            .namespace(&alarm.namespace)
            .period(to_i32("PutMetricAlarm", "period", alarm.period)?)
            .statistic(statistic)
            .threshold(alarm.threshold)
            .actions_enabled(alarm.actions_enabled)
            .set_alarm_actions(Some(alarm.alarm_actions.clone()))
            .unit(unit)
            .send()
            .await
            .map_err(|e| remote_error("PutMetricAlarm", e))?;

        Ok(())
    }
}

#[async_trait]
impl DashboardApi for AwsBackend {
    async fn put_dashboard(&self, dashboard: &DashboardDefinition) -> Result<()> {
        let body = dashboard.body_json()?;

        self.cloudwatch
            .put_dashboard()
            .dashboard_name(&dashboard.dashboard_name)
            .dashboard_body(body)
            .send()
            .await
            .map_err(|e| remote_error("PutDashboard", e))?;

        Ok(())
    }
}

#[async_trait]
impl QueryDefinitionApi for AwsBackend {
    /// Query definitions are keyed by id on the provider side, so an existing
    /// definition with the same name is looked up and replaced in place.
    async fn put_query_definition(&self, query: &QueryDefinition) -> Result<()> {
        let existing = self
            .logs
            .describe_query_definitions()
            .query_definition_name_prefix(&query.name)
            .send()
            .await
            .map_err(|e| remote_error("DescribeQueryDefinitions", e))?;

        let existing_id = existing
            .query_definitions()
            .iter()
            .find(|definition| definition.name() == Some(query.name.as_str()))
            .and_then(|definition| definition.query_definition_id())
            .map(str::to_string);

        self.logs
            .put_query_definition()
            .name(&query.name)
            .query_string(&query.query_string)
            .set_log_group_names(Some(query.log_group_names.clone()))
            .set_query_definition_id(existing_id)
            .send()
            .await
            .map_err(|e| remote_error("PutQueryDefinition", e))?;

        Ok(())
    }
}

#[async_trait]
impl StackOutputApi for AwsBackend {
    async fn stack_output(&self, stack_name: &str, output_key: &str) -> Result<Option<String>> {
        let response = self
            .cloudformation
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| remote_error("DescribeStacks", e))?;

        Ok(response
            .stacks()
            .first()
            .and_then(|stack| {
                stack
                    .outputs()
                    .iter()
                    .find(|output| output.output_key() == Some(output_key))
            })
            .and_then(|output| output.output_value())
            .map(str::to_string))
    }
}
