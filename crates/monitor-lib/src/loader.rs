//! Monitoring document loading
//!
//! The document format is inferred from the file extension (YAML, TOML or
//! JSON) and deserialized directly with that format's serde implementation.
//! Loading happens once, before any resource is synthesized; any failure
//! here is structural and aborts the run.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::models::MonitoringSpec;

/// Well-known document location relative to the invocation directory
pub const DEFAULT_CONFIG_FILE: &str = "custom-metrics.yaml";

/// Document formats accepted by [`load_spec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Yaml,
    Toml,
    Json,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            "toml" => Some(DocumentFormat::Toml),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }

    // Map keys are kept verbatim; severity labels are case-sensitive.
    fn parse<T: DeserializeOwned>(self, contents: &str) -> std::result::Result<T, String> {
        match self {
            DocumentFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
            DocumentFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        }
    }
}

/// Load and validate the monitoring document at `path`
pub fn load_spec(path: &Path) -> Result<MonitoringSpec> {
    let parse_error = |message: String| MonitorError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        parse_error("unsupported document format, expected .yaml, .yml, .toml or .json".to_string())
    })?;

    let contents = std::fs::read_to_string(path).map_err(|source| MonitorError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    // An empty document is an empty spec
    let spec: MonitoringSpec = if contents.trim().is_empty() {
        MonitoringSpec::default()
    } else {
        format.parse(&contents).map_err(parse_error)?
    };
    spec.validate()?;

    debug!(
        path = %path.display(),
        patterns = spec.log_monitoring.patterns.len(),
        alarms = spec.alert_thresholds.pairs().count(),
        widgets = spec.dashboard_widgets.len(),
        "Loaded monitoring document"
    );

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComparisonOperator, WidgetType};
    use crate::naming::{Environment, Naming};
    use std::io::Write;

    const SAMPLE: &str = r#"
log_monitoring:
  patterns:
    - name: clock-in-events
      pattern: "[timestamp, level, msg=\"*CLOCK_IN*\"]"
      metric_name: ClockInCount
      metric_value: "1"
    - name: application-errors
      pattern: ERROR
      metric_name: ErrorCount
      metric_value: "1"

alert_thresholds:
  warning:
    - metric: ErrorCount
      comparison: GreaterThanThreshold
      evaluation_periods: 2
      period: 300
      threshold: 5
  critical:
    - metric: ErrorCount
      comparison: GreaterThanOrEqualToThreshold
      evaluation_periods: 1
      period: 60
      threshold: 20.5

dashboard_widgets:
  - name: Attendance Events
    type: line
    metrics: [ClockInCount]
    width: 12
    height: 6
    period: 300
  - name: Errors
    type: stacked_area
    metrics: [ErrorCount]
    width: 12
    height: 6
    period: 300
"#;

    fn write_document(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_sample_document() {
        let file = write_document(SAMPLE);
        let spec = load_spec(file.path()).unwrap();

        assert_eq!(spec.log_monitoring.patterns.len(), 2);
        assert_eq!(spec.log_monitoring.patterns[0].name, "clock-in-events");
        assert_eq!(spec.log_monitoring.patterns[1].metric_value, "1");

        let severities: Vec<_> = spec.alert_thresholds.severities().collect();
        assert_eq!(severities, vec!["warning", "critical"]);

        let (severity, critical) = spec.alert_thresholds.pairs().nth(1).unwrap();
        assert_eq!(severity, "critical");
        assert_eq!(
            critical.comparison,
            ComparisonOperator::GreaterThanOrEqualToThreshold
        );
        assert_eq!(critical.period, 60);
        assert!((critical.threshold - 20.5).abs() < f64::EPSILON);

        assert_eq!(spec.dashboard_widgets.len(), 2);
        assert_eq!(spec.dashboard_widgets[1].widget_type, WidgetType::StackedArea);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let file = write_document("dashboard_widgets: []\n");
        let spec = load_spec(file.path()).unwrap();

        assert!(spec.log_monitoring.patterns.is_empty());
        assert!(spec.alert_thresholds.is_empty());
        assert!(spec.dashboard_widgets.is_empty());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_spec(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, MonitorError::ConfigRead { .. }));
    }

    #[test]
    fn test_unknown_extension_is_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        file.write_all(b"dashboard_widgets = []\n").unwrap();

        let err = load_spec(file.path()).unwrap_err();
        assert!(matches!(err, MonitorError::ConfigParse { .. }));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let file = write_document("dashboard_widgets: [unclosed\n");
        let err = load_spec(file.path()).unwrap_err();
        assert!(matches!(err, MonitorError::ConfigParse { .. }));
    }

    #[test]
    fn test_severity_labels_keep_their_case() {
        let file = write_document(
            r#"
alert_thresholds:
  Critical:
    - metric: ErrorCount
      comparison: GreaterThanThreshold
      evaluation_periods: 1
      period: 60
      threshold: 20
  critical:
    - metric: ErrorCount
      comparison: GreaterThanThreshold
      evaluation_periods: 2
      period: 300
      threshold: 5
"#,
        );
        let spec = load_spec(file.path()).unwrap();

        let severities: Vec<_> = spec.alert_thresholds.severities().collect();
        assert_eq!(severities, vec!["Critical", "critical"]);

        let naming = Naming::new("proj", Environment::Dev);
        let names: Vec<_> = spec
            .alert_thresholds
            .pairs()
            .map(|(severity, rule)| naming.alarm_name(&rule.metric, severity))
            .collect();
        assert_eq!(
            names,
            vec!["proj-dev-ErrorCount-Critical", "proj-dev-ErrorCount-critical"]
        );
    }

    #[test]
    fn test_unknown_widget_type_passes_through() {
        let file = write_document(
            r#"
dashboard_widgets:
  - name: Latency
    type: singleValue
    metrics: [ResponseTime]
    width: 6
    height: 6
    period: 300
"#,
        );
        let spec = load_spec(file.path()).unwrap();

        let widget_type = &spec.dashboard_widgets[0].widget_type;
        assert_eq!(*widget_type, WidgetType::Other("singleValue".to_string()));
        assert_eq!(widget_type.view(), "singleValue");
        assert!(!widget_type.is_stacked());
    }

    #[test]
    fn test_toml_and_json_documents() {
        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        toml_file
            .write_all(
                br#"
[[alert_thresholds.Warning]]
metric = "ErrorCount"
comparison = "GreaterThanThreshold"
evaluation_periods = 2
period = 300
threshold = 5
"#,
            )
            .unwrap();
        let spec = load_spec(toml_file.path()).unwrap();
        assert_eq!(spec.alert_thresholds.severities().collect::<Vec<_>>(), vec!["Warning"]);

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json_file
            .write_all(br#"{"log_monitoring": {"patterns": [{"name": "errors", "pattern": "ERROR", "metric_name": "ErrorCount", "metric_value": "1"}]}}"#)
            .unwrap();
        let spec = load_spec(json_file.path()).unwrap();
        assert_eq!(spec.log_monitoring.patterns[0].metric_name, "ErrorCount");
    }

    #[test]
    fn test_invalid_widget_rejected_at_load() {
        let file = write_document(
            r#"
dashboard_widgets:
  - name: Too Wide
    type: line
    metrics: [ErrorCount]
    width: 30
    height: 6
    period: 300
"#,
        );
        let err = load_spec(file.path()).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfig(_)));
    }
}
