//! In-memory backend
//!
//! Records every apply call instead of contacting a provider. Used for dry
//! runs and for exercising the synthesizers in tests, including injected
//! per-resource failures and notification lookup failures.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tokio::sync::Mutex;

use super::{
    async_trait, AlarmApi, DashboardApi, MetricFilterApi, QueryDefinitionApi, StackOutputApi,
};
use crate::error::{MonitorError, Result};
use crate::resources::{
    AlarmDefinition, DashboardDefinition, MetricFilterDefinition, QueryDefinition, ResourceKind,
};

/// One apply call as seen by the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedCall {
    pub kind: ResourceKind,
    pub name: String,
    pub body: serde_json::Value,
    /// False when the call was rejected by an injected failure
    pub accepted: bool,
}

#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<RecordedCall>>,
    stack_outputs: HashMap<(String, String), String>,
    failing: HashSet<String>,
    lookup_failure: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stack output returned by `stack_output`
    pub fn with_stack_output(
        mut self,
        stack_name: impl Into<String>,
        output_key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.stack_outputs
            .insert((stack_name.into(), output_key.into()), value.into());
        self
    }

    /// Reject any apply call for the resource with this name
    pub fn failing_on(mut self, resource_name: impl Into<String>) -> Self {
        self.failing.insert(resource_name.into());
        self
    }

    /// Make every stack output lookup fail with `message`
    pub fn with_lookup_failure(mut self, message: impl Into<String>) -> Self {
        self.lookup_failure = Some(message.into());
        self
    }

    /// Snapshot of every call made so far, in call order
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.calls.lock().await.clear();
    }

    async fn record<T: Serialize>(
        &self,
        operation: &'static str,
        kind: ResourceKind,
        name: &str,
        body: &T,
    ) -> Result<()> {
        let accepted = !self.failing.contains(name);
        let call = RecordedCall {
            kind,
            name: name.to_string(),
            body: serde_json::to_value(body)?,
            accepted,
        };
        self.calls.lock().await.push(call);

        if accepted {
            Ok(())
        } else {
            Err(MonitorError::remote(
                operation,
                format!("rejected {}", name),
            ))
        }
    }
}

#[async_trait]
impl MetricFilterApi for RecordingBackend {
    async fn put_metric_filter(&self, filter: &MetricFilterDefinition) -> Result<()> {
        self.record(
            "PutMetricFilter",
            ResourceKind::MetricFilter,
            &filter.filter_name,
            filter,
        )
        .await
    }
}

#[async_trait]
impl AlarmApi for RecordingBackend {
    async fn put_metric_alarm(&self, alarm: &AlarmDefinition) -> Result<()> {
        self.record("PutMetricAlarm", ResourceKind::Alarm, &alarm.alarm_name, alarm)
            .await
    }
}

#[async_trait]
impl DashboardApi for RecordingBackend {
    async fn put_dashboard(&self, dashboard: &DashboardDefinition) -> Result<()> {
        self.record(
            "PutDashboard",
            ResourceKind::Dashboard,
            &dashboard.dashboard_name,
            dashboard,
        )
        .await
    }
}

#[async_trait]
impl QueryDefinitionApi for RecordingBackend {
    async fn put_query_definition(&self, query: &QueryDefinition) -> Result<()> {
        self.record(
            "PutQueryDefinition",
            ResourceKind::QueryDefinition,
            &query.name,
            query,
        )
        .await
    }
}

#[async_trait]
impl StackOutputApi for RecordingBackend {
    async fn stack_output(&self, stack_name: &str, output_key: &str) -> Result<Option<String>> {
        if let Some(message) = &self.lookup_failure {
            return Err(MonitorError::remote("DescribeStacks", message.clone()));
        }

        Ok(self
            .stack_outputs
            .get(&(stack_name.to_string(), output_key.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(name: &str) -> QueryDefinition {
        QueryDefinition {
            name: name.to_string(),
            query_string: "fields @timestamp".to_string(),
            log_group_names: vec!["/aws/lambda/proj-dev".to_string()],
        }
    }

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let backend = RecordingBackend::new();
        backend.put_query_definition(&query("first")).await.unwrap();
        backend.put_query_definition(&query("second")).await.unwrap();

        let calls = backend.calls().await;
        let names: Vec<_> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(calls.iter().all(|c| c.accepted));
        assert_eq!(calls[0].body["queryString"], "fields @timestamp");
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded_and_returned() {
        let backend = RecordingBackend::new().failing_on("broken");
        let err = backend
            .put_query_definition(&query("broken"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("PutQueryDefinition"));
        let calls = backend.calls().await;
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].accepted);
    }

    #[tokio::test]
    async fn test_stack_output_lookup() {
        let backend = RecordingBackend::new().with_stack_output(
            "proj-dev-monitoring",
            "AlertTopicArn",
            "arn:aws:sns:ap-northeast-1:123456789012:alerts",
        );

        let found = backend
            .stack_output("proj-dev-monitoring", "AlertTopicArn")
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = backend
            .stack_output("proj-prod-monitoring", "AlertTopicArn")
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
