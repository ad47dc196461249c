//! Resource synthesizers
//!
//! Each synthesizer turns part of the monitoring document into resource
//! definitions and applies them one at a time. A failed item is reported
//! and the next item is still attempted.

mod alarms;
mod dashboard;
mod filters;
mod queries;


pub use alarms::{alarm_definition, alarm_description, synthesize_alarms};
pub use dashboard::{
    dashboard_definition, layout, synthesize_dashboard, DashboardLayout, PlacedWidget,
    DASHBOARD_LOCAL_ID,
};
pub use filters::{metric_filter_definition, synthesize_metric_filters};
pub use queries::{query_definitions, synthesize_queries, SAVED_QUERIES};

use crate::context::RunContext;
use crate::error::Result;
use crate::report::{ItemOutcome, Reporter};
use crate::resources::ResourceKind;

/// Turn one apply result into an outcome, log it and hand it to the reporter
fn settle(
    ctx: &RunContext,
    kind: ResourceKind,
    name: String,
    result: Result<()>,
    reporter: &mut dyn Reporter,
) -> ItemOutcome {
    let item = match result {
        Ok(()) => {
            ctx.logger.log_resource_applied(kind, &name);
            ItemOutcome::applied(kind, name)
        }
        Err(err) => {
            let cause = err.to_string();
            ctx.logger.log_resource_failed(kind, &name, &cause);
            ItemOutcome::failed(kind, name, cause)
        }
    };

    reporter.item_finished(&item);
    item
}
