//! Notification target resolution
//!
//! Alarms notify a topic exported by the environment's monitoring stack.
//! Lookup failures degrade to an absent target: alarms are still created,
//! just without actions.

use serde::Serialize;

use crate::context::RunContext;
use crate::report::Reporter;

/// Stack output that carries the alert topic reference
pub const ALERT_TOPIC_OUTPUT_KEY: &str = "AlertTopicArn";

/// Optional reference to an external notification channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationTarget(Option<String>);

impl NotificationTarget {
    pub fn resolved(reference: impl Into<String>) -> Self {
        Self(Some(reference.into()))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn is_resolved(&self) -> bool {
        self.0.is_some()
    }

    pub fn reference(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Alarm action list: the target if resolved, otherwise empty
    pub fn alarm_actions(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Look up the environment's alert topic. Never fails.
pub async fn resolve(ctx: &RunContext, reporter: &mut dyn Reporter) -> NotificationTarget {
    let stack_name = ctx.naming.monitoring_stack();

    let lookup = ctx
        .collaborators
        .stack_outputs
        .stack_output(&stack_name, ALERT_TOPIC_OUTPUT_KEY)
        .await;

    let message = match lookup {
        Ok(Some(reference)) => {
            ctx.logger
                .log_notification_target(&stack_name, Some(reference.as_str()));
            return NotificationTarget::resolved(reference);
        }
        Ok(None) => format!(
            "Could not retrieve SNS topic ARN: stack {} has no {} output",
            stack_name, ALERT_TOPIC_OUTPUT_KEY
        ),
        Err(err) => format!("Could not retrieve SNS topic ARN: {}", err),
    };

    ctx.logger.log_notification_target(&stack_name, None);
    reporter.warning(&message);
    NotificationTarget::absent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Collaborators, RecordingBackend};
    use crate::context::RunSettings;
    use crate::naming::Environment;
    use crate::report::CollectingReporter;
    use std::sync::Arc;

    const TOPIC: &str = "arn:aws:sns:ap-northeast-1:123456789012:proj-dev-alerts";

    fn context(backend: RecordingBackend) -> RunContext {
        RunContext::new(
            RunSettings::new(Environment::Dev).with_project_name("proj"),
            Collaborators::from_backend(Arc::new(backend)),
        )
    }

    #[tokio::test]
    async fn test_resolves_exported_topic() {
        let ctx = context(RecordingBackend::new().with_stack_output(
            "proj-dev-monitoring",
            ALERT_TOPIC_OUTPUT_KEY,
            TOPIC,
        ));
        let mut reporter = CollectingReporter::default();

        let target = resolve(&ctx, &mut reporter).await;

        assert_eq!(target.reference(), Some(TOPIC));
        assert_eq!(target.alarm_actions(), vec![TOPIC.to_string()]);
        assert!(reporter.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades_to_absent() {
        let ctx = context(RecordingBackend::new().with_lookup_failure("Stack does not exist"));
        let mut reporter = CollectingReporter::default();

        let target = resolve(&ctx, &mut reporter).await;

        assert!(!target.is_resolved());
        assert!(target.alarm_actions().is_empty());
        assert_eq!(reporter.warnings.len(), 1);
        assert!(reporter.warnings[0].contains("Stack does not exist"));
    }

    #[tokio::test]
    async fn test_missing_output_degrades_to_absent() {
        let ctx = context(RecordingBackend::new().with_stack_output(
            "proj-dev-monitoring",
            "SomeOtherOutput",
            "value",
        ));
        let mut reporter = CollectingReporter::default();

        let target = resolve(&ctx, &mut reporter).await;

        assert_eq!(target, NotificationTarget::absent());
        assert!(reporter.warnings[0].contains(ALERT_TOPIC_OUTPUT_KEY));
    }
}
