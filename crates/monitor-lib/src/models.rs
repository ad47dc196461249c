//! Monitoring document data model
//!
//! The document is loaded once per run and treated as immutable afterwards.
//! Synthesizers only ever see shared references to it.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MonitorError, Result};

/// Grid row capacity of a dashboard
pub const GRID_WIDTH: u32 = 24;

/// Parsed monitoring document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSpec {
    #[serde(default)]
    pub log_monitoring: LogMonitoring,
    #[serde(default)]
    pub alert_thresholds: SeverityThresholds,
    #[serde(default)]
    pub dashboard_widgets: Vec<WidgetSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogMonitoring {
    #[serde(default)]
    pub patterns: Vec<LogPatternRule>,
}

/// A log pattern that is turned into a log-derived metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogPatternRule {
    pub name: String,
    /// Provider filter-expression syntax, passed through untouched
    pub pattern: String,
    pub metric_name: String,
    /// Provider metric-value expression, e.g. `"1"` or `"$.duration"`
    pub metric_value: String,
}

/// Comparison operators accepted by threshold alarms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    GreaterThanThreshold,
    GreaterThanOrEqualToThreshold,
    LessThanThreshold,
    LessThanOrEqualToThreshold,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThanThreshold => "GreaterThanThreshold",
            ComparisonOperator::GreaterThanOrEqualToThreshold => "GreaterThanOrEqualToThreshold",
            ComparisonOperator::LessThanThreshold => "LessThanThreshold",
            ComparisonOperator::LessThanOrEqualToThreshold => "LessThanOrEqualToThreshold",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold rule grouped under a severity label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub metric: String,
    pub comparison: ComparisonOperator,
    pub evaluation_periods: u32,
    /// Seconds. Passed through without checking provider granularity.
    pub period: u32,
    pub threshold: f64,
}

/// Severity label to threshold rules, in document order
///
/// A plain `HashMap` would lose the order in which severities appear in the
/// document, and alarm synthesis iterates in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeverityThresholds(Vec<(String, Vec<ThresholdRule>)>);

impl SeverityThresholds {
    pub fn new(groups: Vec<(String, Vec<ThresholdRule>)>) -> Self {
        Self(groups)
    }

    /// Iterate `(severity, rule)` pairs, severity order first, then rule order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &ThresholdRule)> {
        self.0
            .iter()
            .flat_map(|(severity, rules)| rules.iter().map(move |rule| (severity.as_str(), rule)))
    }

    pub fn severities(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(severity, _)| severity.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, rules)| rules.is_empty())
    }
}

impl Serialize for SeverityThresholds {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(severity, rules)| (severity, rules)))
    }
}

impl<'de> Deserialize<'de> for SeverityThresholds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedGroups;

        impl<'de> Visitor<'de> for OrderedGroups {
            type Value = SeverityThresholds;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of severity to a list of threshold rules")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut groups = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((severity, rules)) =
                    access.next_entry::<String, Vec<ThresholdRule>>()?
                {
                    groups.push((severity, rules));
                }
                Ok(SeverityThresholds(groups))
            }
        }

        deserializer.deserialize_map(OrderedGroups)
    }
}

/// Dashboard widget rendering style
///
/// Types outside the known set are kept verbatim in `Other` and handed to
/// the dashboard service as the view name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetType {
    Line,
    StackedArea,
    Number,
    Bar,
    Pie,
    Gauge,
    Other(String),
}

impl WidgetType {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetType::Line => "line",
            WidgetType::StackedArea => "stacked_area",
            WidgetType::Number => "number",
            WidgetType::Bar => "bar",
            WidgetType::Pie => "pie",
            WidgetType::Gauge => "gauge",
            WidgetType::Other(name) => name,
        }
    }

    /// View name sent to the dashboard service.
    ///
    /// Only `line` maps to `timeSeries`; every other type is passed through
    /// by name so existing dashboards keep rendering the same way.
    pub fn view(&self) -> &str {
        match self {
            WidgetType::Line => "timeSeries",
            other => other.as_str(),
        }
    }

    pub fn is_stacked(&self) -> bool {
        matches!(self, WidgetType::StackedArea)
    }
}

impl From<String> for WidgetType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "line" => WidgetType::Line,
            "stacked_area" => WidgetType::StackedArea,
            "number" => WidgetType::Number,
            "bar" => WidgetType::Bar,
            "pie" => WidgetType::Pie,
            "gauge" => WidgetType::Gauge,
            _ => WidgetType::Other(name),
        }
    }
}

impl From<WidgetType> for String {
    fn from(widget_type: WidgetType) -> Self {
        widget_type.as_str().to_string()
    }
}

/// A single dashboard widget as configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub metrics: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub period: u32,
}

impl MonitoringSpec {
    /// Check the structural invariants the synthesizers rely on
    pub fn validate(&self) -> Result<()> {
        let mut pattern_names = HashSet::new();
        for rule in &self.log_monitoring.patterns {
            if !pattern_names.insert(rule.name.as_str()) {
                return Err(MonitorError::InvalidConfig(format!(
                    "duplicate log pattern name '{}'",
                    rule.name
                )));
            }
        }

        let mut alarm_keys = HashSet::new();
        for (severity, rule) in self.alert_thresholds.pairs() {
            if !alarm_keys.insert((severity, rule.metric.as_str())) {
                return Err(MonitorError::InvalidConfig(format!(
                    "duplicate threshold for metric '{}' under severity '{}'",
                    rule.metric, severity
                )));
            }
            if rule.evaluation_periods == 0 || rule.period == 0 {
                return Err(MonitorError::InvalidConfig(format!(
                    "threshold for metric '{}' under severity '{}' needs positive period and evaluation_periods",
                    rule.metric, severity
                )));
            }
        }

        for widget in &self.dashboard_widgets {
            if widget.width == 0 || widget.width > GRID_WIDTH {
                return Err(MonitorError::InvalidConfig(format!(
                    "widget '{}' width {} outside 1..={}",
                    widget.name, widget.width, GRID_WIDTH
                )));
            }
            if widget.height == 0 || widget.period == 0 {
                return Err(MonitorError::InvalidConfig(format!(
                    "widget '{}' needs positive height and period",
                    widget.name
                )));
            }
        }

        Ok(())
    }
}
