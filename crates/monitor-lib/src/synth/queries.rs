//! Saved log-analysis queries

use crate::context::RunContext;
use crate::naming::Naming;
use crate::report::{ItemOutcome, Reporter};
use crate::resources::{QueryDefinition, ResourceKind};

use super::settle;

/// `(name suffix, query)` for every saved query, in apply order
pub const SAVED_QUERIES: [(&str, &str); 3] = [
    (
        "attendance-analysis",
        "fields @timestamp, @message, employee_id, action\n\
         | filter @message like /ATTENDANCE/\n\
         | stats count() by action, bin(1h)\n\
         | sort @timestamp desc",
    ),
    (
        "error-analysis",
        "fields @timestamp, @message, @requestId\n\
         | filter @message like /ERROR/\n\
         | stats count() by bin(5m)\n\
         | sort @timestamp desc",
    ),
    (
        "performance-analysis",
        "fields @timestamp, @duration, @billedDuration, @memorySize, @maxMemoryUsed\n\
         | filter @type = \"REPORT\"\n\
         | stats avg(@duration), max(@duration), min(@duration) by bin(5m)",
    ),
];

pub fn query_definitions(naming: &Naming, log_group: &str) -> Vec<QueryDefinition> {
    SAVED_QUERIES
        .iter()
        .map(|(suffix, query)| QueryDefinition {
            name: naming.resource_name(suffix),
            query_string: (*query).to_string(),
            log_group_names: vec![log_group.to_string()],
        })
        .collect()
}

pub async fn synthesize_queries(ctx: &RunContext, reporter: &mut dyn Reporter) -> Vec<ItemOutcome> {
    let mut outcomes = Vec::with_capacity(SAVED_QUERIES.len());

    for query in query_definitions(&ctx.naming, &ctx.log_group()) {
        let result = ctx.collaborators.queries.put_query_definition(&query).await;
        outcomes.push(settle(
            ctx,
            ResourceKind::QueryDefinition,
            query.name,
            result,
            reporter,
        ));
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::Environment;

    #[test]
    fn test_three_queries_scoped_to_log_group() {
        let naming = Naming::new("proj", Environment::Staging);
        let queries = query_definitions(&naming, "/aws/lambda/proj-staging");

        let names: Vec<_> = queries.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "proj-staging-attendance-analysis",
                "proj-staging-error-analysis",
                "proj-staging-performance-analysis",
            ]
        );
        assert!(queries
            .iter()
            .all(|q| q.log_group_names == vec!["/aws/lambda/proj-staging".to_string()]));
    }

    #[test]
    fn test_query_bucketing() {
        let naming = Naming::new("proj", Environment::Dev);
        let queries = query_definitions(&naming, "/aws/lambda/proj-dev");

        assert!(queries[0].query_string.contains("bin(1h)"));
        assert!(queries[0].query_string.contains("/ATTENDANCE/"));
        assert!(queries[1].query_string.contains("bin(5m)"));
        assert!(queries[1].query_string.contains("/ERROR/"));
        assert!(queries[2].query_string.contains("@type = \"REPORT\""));
        assert!(queries[2].query_string.contains("max(@duration)"));
    }
}
