//! Monitoring resource synthesis
//!
//! This crate turns a declarative monitoring document into the remote
//! observability resources of one deployment environment:
//! - Log-derived metric filters
//! - Threshold alarms wired to the environment's alert topic
//! - A composite dashboard laid out on a 24-column grid
//! - Saved log-analysis queries
//!
//! Every resource name is derived from `(project, environment, local id)`,
//! so environments of the same project coexist without collisions.

pub mod backend;
pub mod context;
pub mod error;
pub mod loader;
pub mod models;
pub mod naming;
pub mod notification;
pub mod observability;
pub mod orchestrator;
pub mod report;
pub mod resources;
pub mod synth;

pub use backend::{AwsBackend, Collaborators, RecordingBackend};
pub use context::{RunContext, RunSettings};
pub use error::{MonitorError, Result};
pub use loader::{load_spec, DEFAULT_CONFIG_FILE};
pub use models::*;
pub use naming::{Environment, Naming};
pub use notification::NotificationTarget;
pub use observability::{RunMetrics, StructuredLogger};
pub use orchestrator::run;
pub use report::{ItemOutcome, Outcome, Reporter, RunReport, Section};
