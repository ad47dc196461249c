//! Remote resource definitions produced by the synthesizers
//!
//! These are plain values. Backends translate them into provider calls; the
//! recording backend stores their JSON form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::ComparisonOperator;

/// Kind of remote object a definition describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    MetricFilter,
    Alarm,
    Dashboard,
    QueryDefinition,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::MetricFilter => "metric_filter",
            ResourceKind::Alarm => "alarm",
            ResourceKind::Dashboard => "dashboard",
            ResourceKind::QueryDefinition => "query_definition",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::MetricFilter => write!(f, "metric filter"),
            ResourceKind::Alarm => write!(f, "alarm"),
            ResourceKind::Dashboard => write!(f, "dashboard"),
            ResourceKind::QueryDefinition => write!(f, "Insights query"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricFilterDefinition {
    pub log_group_name: String,
    pub filter_name: String,
    pub filter_pattern: String,
    pub metric_transformations: Vec<MetricTransformation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTransformation {
    pub metric_name: String,
    pub metric_namespace: String,
    pub metric_value: String,
    pub default_value: f64,
}

/// Aggregation applied to alarm metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    Sum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmDefinition {
    pub alarm_name: String,
    pub alarm_description: String,
    pub comparison_operator: ComparisonOperator,
    pub evaluation_periods: u32,
    pub metric_name: String,
    pub namespace: String,
    pub period: u32,
    pub statistic: Statistic,
    pub threshold: f64,
    pub actions_enabled: bool,
    pub alarm_actions: Vec<String>,
    pub unit: MetricUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardDefinition {
    pub dashboard_name: String,
    pub dashboard_body: DashboardBody,
}

impl DashboardDefinition {
    /// Body as the JSON document the dashboard service expects
    pub fn body_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.dashboard_body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardBody {
    pub widgets: Vec<DashboardWidget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardWidget {
    /// Always `"metric"`
    #[serde(rename = "type")]
    pub widget_type: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub properties: WidgetProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetProperties {
    /// `[namespace, metric_name]` pairs
    pub metrics: Vec<[String; 2]>,
    pub view: String,
    pub stacked: bool,
    pub region: String,
    pub title: String,
    pub period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefinition {
    pub name: String,
    pub query_string: String,
    pub log_group_names: Vec<String>,
}
