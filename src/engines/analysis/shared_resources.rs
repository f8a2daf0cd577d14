// Shared-resource detection: nodes multiple resources depend on

use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;
use crate::engines::graph::DependencyGraph;
use crate::engines::shared::models::NormalizedPlan;

/// A resource at least two other resources depend on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharedResource {
    pub address: String,
    pub is_critical: bool,
}

/// Detect shared resources: in-degree ≥ 2 in the dependency graph. Critical
/// flagging comes from the configured type list. Output is sorted by
/// address.
pub fn detect(
    graph: &DependencyGraph,
    plan: &NormalizedPlan,
    config: &RiskConfig,
) -> Vec<SharedResource> {
    graph
        .nodes()
        .filter(|address| graph.in_degree(address) >= 2)
        .map(|address| {
            let is_critical = plan
                .get(address)
                .map(|r| config.is_critical_type(&r.resource_type))
                .unwrap_or(false);
            SharedResource {
                address: address.to_string(),
                is_critical,
            }
        })
        .collect()
}
