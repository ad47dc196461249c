//! Remote collaborators
//!
//! Each capability the synthesizers need is a separate trait so tests and
//! dry runs can swap in the in-memory backend. All apply calls are
//! create-or-replace keyed by resource name.

mod aws;
mod recording;

pub use aws::AwsBackend;
pub use recording::{RecordedCall, RecordingBackend};

use std::sync::Arc;

pub use async_trait::async_trait;

use crate::error::Result;
use crate::resources::{
    AlarmDefinition, DashboardDefinition, MetricFilterDefinition, QueryDefinition,
};

/// Can create or replace a log-derived metric filter
#[async_trait]
pub trait MetricFilterApi: Send + Sync {
    async fn put_metric_filter(&self, filter: &MetricFilterDefinition) -> Result<()>;
}

/// Can create or replace a threshold alarm
#[async_trait]
pub trait AlarmApi: Send + Sync {
    async fn put_metric_alarm(&self, alarm: &AlarmDefinition) -> Result<()>;
}

/// Can create or replace a dashboard
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn put_dashboard(&self, dashboard: &DashboardDefinition) -> Result<()>;
}

/// Can create or replace a saved log query
#[async_trait]
pub trait QueryDefinitionApi: Send + Sync {
    async fn put_query_definition(&self, query: &QueryDefinition) -> Result<()>;
}

/// Can read an exported output of a previously provisioned stack
#[async_trait]
pub trait StackOutputApi: Send + Sync {
    /// `Ok(None)` when the stack exists but does not export `output_key`
    async fn stack_output(&self, stack_name: &str, output_key: &str) -> Result<Option<String>>;
}

/// Handles to every remote capability used during a run
#[derive(Clone)]
pub struct Collaborators {
    pub metric_filters: Arc<dyn MetricFilterApi>,
    pub alarms: Arc<dyn AlarmApi>,
    pub dashboards: Arc<dyn DashboardApi>,
    pub queries: Arc<dyn QueryDefinitionApi>,
    pub stack_outputs: Arc<dyn StackOutputApi>,
}

impl Collaborators {
    /// Use a single backend for every capability
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: MetricFilterApi
            + AlarmApi
            + DashboardApi
            + QueryDefinitionApi
            + StackOutputApi
            + 'static,
    {
        Self {
            metric_filters: backend.clone(),
            alarms: backend.clone(),
            dashboards: backend.clone(),
            queries: backend.clone(),
            stack_outputs: backend,
        }
    }
}
