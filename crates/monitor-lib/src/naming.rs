//! Resource naming and namespacing
//!
//! Every remote object name is derived from the project, the environment and
//! a resource-local identifier. Two environments of the same project never
//! share a name, which is what lets them coexist in one account.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deployment environments a run can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives every resource identity for one `(project, environment)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    project_name: String,
    environment: Environment,
}

impl Naming {
    pub fn new(project_name: impl Into<String>, environment: Environment) -> Self {
        Self {
            project_name: project_name.into(),
            environment,
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// `{project}-{environment}`, the prefix shared by all resource names
    pub fn prefix(&self) -> String {
        format!("{}-{}", self.project_name, self.environment)
    }

    /// `{project}-{environment}-{local_id}`
    pub fn resource_name(&self, local_id: &str) -> String {
        format!("{}-{}", self.prefix(), local_id)
    }

    /// `{project}/{environment}`
    pub fn metric_namespace(&self) -> String {
        format!("{}/{}", self.project_name, self.environment)
    }

    /// `{root}/{project}-{environment}`
    pub fn log_group(&self, root: &str) -> String {
        format!("{}/{}", root.trim_end_matches('/'), self.prefix())
    }

    /// Stack whose outputs carry the environment's notification target
    pub fn monitoring_stack(&self) -> String {
        self.resource_name("monitoring")
    }

    /// Alarm identity is the `(metric, severity)` pair
    pub fn alarm_name(&self, metric: &str, severity: &str) -> String {
        self.resource_name(&format!("{}-{}", metric, severity))
    }
}
