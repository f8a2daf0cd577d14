// Blast radius: resources affected by the changed set

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::engines::graph::DependencyGraph;
use crate::engines::shared::models::NormalizedPlan;

/// Result of the blast-radius traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlastRadius {
    pub affected_count: usize,
    pub changed_count: usize,
    /// Sorted unique component labels across the affected set
    pub affected_components: Vec<String>,
    /// Sorted affected addresses (changed resources plus their transitive
    /// dependents)
    pub affected: BTreeSet<String>,
}

/// Compute the affected set: for every changed resource, itself plus every
/// resource reachable backwards along dependency edges. The traversal is
/// BFS with a visited set, so cyclic input cannot double-count.
pub fn compute(graph: &DependencyGraph, plan: &NormalizedPlan) -> BlastRadius {
    let changed = plan.changed_addresses();

    let mut affected: BTreeSet<String> = BTreeSet::new();
    for address in &changed {
        affected.insert((*address).to_string());
        affected.extend(graph.downstream(address));
    }

    let mut components: BTreeSet<String> = BTreeSet::new();
    for address in &affected {
        if let Some(resource) = plan.get(address) {
            components.insert(component_label(&resource.module, &resource.resource_type));
        }
    }

    BlastRadius {
        affected_count: affected.len(),
        changed_count: changed.len(),
        affected_components: components.into_iter().collect(),
        affected,
    }
}

/// Component label for a resource: its module path when present, otherwise
/// the resource type up to the first dot
fn component_label(module: &str, resource_type: &str) -> String {
    if !module.is_empty() {
        module.to_string()
    } else {
        resource_type
            .split('.')
            .next()
            .unwrap_or(resource_type)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::graph::build_graph;
    use crate::engines::shared::models::{NormalizedResource, ResourceAction};
    use std::collections::BTreeSet as Set;

    fn resource(address: &str, module: &str, action: ResourceAction, deps: &[&str]) -> NormalizedResource {
        let rtype = address
            .trim_start_matches(&format!("{}.", module))
            .split('.')
            .next()
            .unwrap_or("")
            .to_string();
        NormalizedResource {
            id: address.rsplit('.').next().unwrap_or("").to_string(),
            module: module.to_string(),
            resource_type: rtype,
            address: address.to_string(),
            action,
            depends_on: deps.iter().map(|s| s.to_string()).collect::<Set<_>>(),
            before: None,
            after: None,
        }
    }

    #[test]
    fn test_changed_resource_counts_itself() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource("aws_s3_bucket.logs", "", ResourceAction::Create, &[]))
            .unwrap();

        let graph = build_graph(&plan);
        let blast = compute(&graph, &plan);
        assert_eq!(blast.affected_count, 1);
        assert_eq!(blast.changed_count, 1);
        assert_eq!(blast.affected_components, vec!["aws_s3_bucket"]);
    }

    #[test]
    fn test_dependents_of_changed_are_affected() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource("aws_vpc.main", "", ResourceAction::Update, &[]))
            .unwrap();
        plan.push(resource(
            "aws_subnet.a",
            "",
            ResourceAction::NoOp,
            &["aws_vpc.main"],
        ))
        .unwrap();

        let graph = build_graph(&plan);
        let blast = compute(&graph, &plan);
        assert_eq!(blast.changed_count, 1);
        assert_eq!(blast.affected_count, 2);
        assert!(blast.affected.contains("aws_subnet.a"));
    }

    #[test]
    fn test_no_ops_do_not_seed_the_traversal() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource("aws_vpc.main", "", ResourceAction::NoOp, &[]))
            .unwrap();
        plan.push(resource(
            "aws_subnet.a",
            "",
            ResourceAction::NoOp,
            &["aws_vpc.main"],
        ))
        .unwrap();

        let graph = build_graph(&plan);
        let blast = compute(&graph, &plan);
        assert_eq!(blast.affected_count, 0);
        assert_eq!(blast.changed_count, 0);
    }

    #[test]
    fn test_module_path_wins_as_component_label() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource(
            "module.net.aws_vpc.main",
            "module.net",
            ResourceAction::Update,
            &[],
        ))
        .unwrap();

        let graph = build_graph(&plan);
        let blast = compute(&graph, &plan);
        assert_eq!(blast.affected_components, vec!["module.net"]);
    }
}
