//! Run settings and the collaborator bundle passed to every synthesizer

use crate::backend::Collaborators;
use crate::naming::{Environment, Naming};
use crate::observability::StructuredLogger;

pub const DEFAULT_PROJECT_NAME: &str = "attendance-management";
pub const DEFAULT_REGION: &str = "ap-northeast-1";
pub const DEFAULT_LOG_GROUP_ROOT: &str = "/aws/lambda";

/// Identifiers that scope a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub project_name: String,
    pub environment: Environment,
    pub region: String,
    pub log_group_root: String,
}

impl RunSettings {
    pub fn new(environment: Environment) -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            environment,
            region: DEFAULT_REGION.to_string(),
            log_group_root: DEFAULT_LOG_GROUP_ROOT.to_string(),
        }
    }

    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = project_name.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_log_group_root(mut self, root: impl Into<String>) -> Self {
        self.log_group_root = root.into();
        self
    }
}

/// Resolved identifiers plus remote collaborator handles for one run
///
/// Built once and handed to each synthesizer by reference.
pub struct RunContext {
    pub naming: Naming,
    pub region: String,
    pub log_group_root: String,
    pub collaborators: Collaborators,
    pub logger: StructuredLogger,
}

impl RunContext {
    pub fn new(settings: RunSettings, collaborators: Collaborators) -> Self {
        let naming = Naming::new(settings.project_name, settings.environment);
        let logger = StructuredLogger::new(naming.prefix());

        Self {
            naming,
            region: settings.region,
            log_group_root: settings.log_group_root,
            collaborators,
            logger,
        }
    }

    /// The environment's log group every filter and query is scoped to
    pub fn log_group(&self) -> String {
        self.naming.log_group(&self.log_group_root)
    }
}
