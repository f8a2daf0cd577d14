// Builds the dependency graph from a normalized plan

use super::graph_types::DependencyGraph;
use crate::engines::shared::models::NormalizedPlan;

/// Build the directed dependency graph. Every resource becomes a node; each
/// entry of `depends_on` becomes an edge from the declaring resource to its
/// prerequisite. The normalizer already discarded dangling references, so
/// every edge endpoint is a plan address.
pub fn build_graph(plan: &NormalizedPlan) -> DependencyGraph {
    let mut graph = DependencyGraph::new();

    for resource in &plan.resources {
        graph.add_node(&resource.address);
    }

    for resource in &plan.resources {
        for dependency in &resource.depends_on {
            graph.add_edge(&resource.address, dependency);
        }
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built dependency graph"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::shared::models::{NormalizedResource, ResourceAction};
    use std::collections::BTreeSet;

    fn resource(address: &str, deps: &[&str]) -> NormalizedResource {
        NormalizedResource {
            id: address.rsplit('.').next().unwrap_or(address).to_string(),
            module: String::new(),
            resource_type: address.split('.').next().unwrap_or("").to_string(),
            address: address.to_string(),
            action: ResourceAction::Update,
            depends_on: deps.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            before: None,
            after: None,
        }
    }

    #[test]
    fn test_every_resource_is_a_node() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource("aws_vpc.main", &[])).unwrap();
        plan.push(resource("aws_subnet.a", &["aws_vpc.main"])).unwrap();

        let graph = build_graph(&plan);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.in_degree("aws_vpc.main"), 1);
    }

    #[test]
    fn test_downstream_follows_dependents() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource("aws_vpc.main", &[])).unwrap();
        plan.push(resource("aws_subnet.a", &["aws_vpc.main"])).unwrap();
        plan.push(resource("aws_instance.web", &["aws_subnet.a"])).unwrap();

        let graph = build_graph(&plan);
        let downstream = graph.downstream("aws_vpc.main");
        assert_eq!(downstream.len(), 2);
        assert!(downstream.contains("aws_subnet.a"));
        assert!(downstream.contains("aws_instance.web"));
    }
}
