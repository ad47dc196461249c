//! Per-item outcomes and run reporting
//!
//! Every synthesize-one-item step yields an [`ItemOutcome`]. Outcomes are
//! streamed to a [`Reporter`] as they happen and collected into the
//! [`RunReport`] returned by the orchestrator.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::naming::{Environment, Naming};
use crate::resources::ResourceKind;

/// Result of applying a single resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Failed { cause: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemOutcome {
    pub kind: ResourceKind,
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ItemOutcome {
    pub fn applied(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            outcome: Outcome::Applied,
        }
    }

    pub fn failed(kind: ResourceKind, name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            outcome: Outcome::Failed {
                cause: cause.into(),
            },
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, Outcome::Applied)
    }

    pub fn cause(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Applied => None,
            Outcome::Failed { cause } => Some(cause),
        }
    }
}

/// Stages of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    MetricFilters,
    Alarms,
    Dashboard,
    QueryDefinitions,
}

impl Section {
    pub fn heading(&self) -> &'static str {
        match self {
            Section::MetricFilters => "Creating log metric filters...",
            Section::Alarms => "Creating custom alarms...",
            Section::Dashboard => "Creating custom dashboard...",
            Section::QueryDefinitions => "Setting up CloudWatch Insights queries...",
        }
    }
}

/// Everything that happened during one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub project_name: String,
    pub environment: Environment,
    pub region: String,
    pub notification_target: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub items: Vec<ItemOutcome>,
}

impl RunReport {
    pub fn applied_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_applied()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.items.len() - self.applied_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(|item| !item.is_applied())
    }

    pub fn items_of(&self, kind: ResourceKind) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(move |item| item.kind == kind)
    }
}

/// Console link to a dashboard
pub fn dashboard_url(region: &str, dashboard_name: &str) -> String {
    format!(
        "https://console.aws.amazon.com/cloudwatch/home?region={}#dashboards:name={}",
        region, dashboard_name
    )
}

/// Receives run progress as it happens
///
/// All methods default to doing nothing.
pub trait Reporter: Send {
    fn run_started(&mut self, _naming: &Naming, _region: &str) {}

    fn section_started(&mut self, _section: Section) {}

    fn item_finished(&mut self, _item: &ItemOutcome) {}

    /// Degraded-but-non-fatal conditions
    fn warning(&mut self, _message: &str) {}

    /// Informational remarks, such as a section with nothing configured
    fn note(&mut self, _message: &str) {}

    fn section_finished(&mut self, _section: Section) {}

    fn run_finished(&mut self, _report: &RunReport) {}
}

/// Reporter that discards everything
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Reporter that keeps every event, for assertions
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub sections: Vec<Section>,
    pub items: Vec<ItemOutcome>,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
}

impl Reporter for CollectingReporter {
    fn section_started(&mut self, section: Section) {
        self.sections.push(section);
    }

    fn item_finished(&mut self, item: &ItemOutcome) {
        self.items.push(item.clone());
    }

    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn note(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(items: Vec<ItemOutcome>) -> RunReport {
        RunReport {
            project_name: "proj".to_string(),
            environment: Environment::Dev,
            region: "ap-northeast-1".to_string(),
            notification_target: None,
            started_at: Utc::now(),
            finished_at: Utc::now(),
            items,
        }
    }

    #[test]
    fn test_counts_and_failures() {
        let report = report(vec![
            ItemOutcome::applied(ResourceKind::MetricFilter, "a"),
            ItemOutcome::failed(ResourceKind::MetricFilter, "b", "boom"),
            ItemOutcome::applied(ResourceKind::Alarm, "c"),
        ]);

        assert_eq!(report.applied_count(), 2);
        assert_eq!(report.failed_count(), 1);
        let failed: Vec<_> = report.failures().map(|i| i.name.as_str()).collect();
        assert_eq!(failed, vec!["b"]);
        assert_eq!(report.items_of(ResourceKind::MetricFilter).count(), 2);
    }

    #[test]
    fn test_outcome_serialization() {
        let item = ItemOutcome::failed(ResourceKind::Alarm, "proj-dev-ErrorCount-critical", "denied");
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["kind"], "alarm");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["cause"], "denied");
    }

    #[test]
    fn test_dashboard_url() {
        assert_eq!(
            dashboard_url("ap-northeast-1", "proj-dev-custom"),
            "https://console.aws.amazon.com/cloudwatch/home?region=ap-northeast-1#dashboards:name=proj-dev-custom"
        );
    }
}
