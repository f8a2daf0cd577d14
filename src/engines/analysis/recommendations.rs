// Recommendation engine: ordered predicate table over analysis artifacts

use std::collections::BTreeSet;

use crate::config::type_matches;
use crate::engines::analysis::blast_radius::BlastRadius;
use crate::engines::analysis::shared_resources::SharedResource;
use crate::engines::shared::models::{NormalizedPlan, ResourceAction, SecurityExposure};

/// Data-backed types whose deletion warrants a backup check
const DATA_BACKED_TYPES: [&str; 4] = [
    "aws_db_instance",
    "aws_rds_*",
    "aws_s3_bucket",
    "aws_dynamodb_*",
];

/// Blast-radius size above which a phased rollout is suggested
const LARGE_BLAST_THRESHOLD: usize = 10;

/// Produce recommendations by running the fixed rule table in declaration
/// order, de-duplicating by text.
pub fn compute(
    plan: &NormalizedPlan,
    exposures: &[SecurityExposure],
    shared: &[SharedResource],
    blast: &BlastRadius,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |text: &str| {
        if !out.iter().any(|existing| existing == text) {
            out.push(text.to_string());
        }
    };

    let data_backed_deletion = plan.resources.iter().any(|r| {
        r.action == ResourceAction::Delete
            && DATA_BACKED_TYPES
                .iter()
                .any(|p| type_matches(p, &r.resource_type))
    });
    if data_backed_deletion {
        push("verify backup before proceeding");
    }

    if !exposures.is_empty() {
        push("restrict ingress to known CIDR ranges");
    }

    let shared_critical_modified = shared.iter().any(|s| {
        s.is_critical
            && plan
                .get(&s.address)
                .is_some_and(|r| r.action.is_change())
    });
    if shared_critical_modified {
        push("apply in stages to reduce blast radius");
    }

    if blast.affected_count > LARGE_BLAST_THRESHOLD {
        push("large blast radius, consider phased rollout");
    }

    let modules: BTreeSet<&str> = plan
        .resources
        .iter()
        .filter(|r| r.action.is_change() && !r.module.is_empty())
        .map(|r| r.module.as_str())
        .collect();
    if modules.len() >= 2 {
        push("cross-module change, coordinate with module owners");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::graph::build_graph;
    use crate::engines::shared::models::{
        ExposureKind, NormalizedResource, Severity,
    };
    use std::collections::BTreeSet as Set;

    fn resource(
        address: &str,
        rtype: &str,
        module: &str,
        action: ResourceAction,
    ) -> NormalizedResource {
        NormalizedResource {
            id: address.rsplit('.').next().unwrap_or("").to_string(),
            module: module.to_string(),
            resource_type: rtype.to_string(),
            address: address.to_string(),
            action,
            depends_on: Set::new(),
            before: None,
            after: None,
        }
    }

    fn blast_of(plan: &NormalizedPlan) -> BlastRadius {
        let graph = build_graph(plan);
        crate::engines::analysis::blast_radius::compute(&graph, plan)
    }

    #[test]
    fn test_rds_deletion_recommends_backup() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource(
            "aws_db_instance.prod",
            "aws_db_instance",
            "",
            ResourceAction::Delete,
        ))
        .unwrap();

        let blast = blast_of(&plan);
        let recs = compute(&plan, &[], &[], &blast);
        assert_eq!(recs, vec!["verify backup before proceeding"]);
    }

    #[test]
    fn test_clean_create_has_no_recommendations() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource(
            "aws_s3_bucket.logs",
            "aws_s3_bucket",
            "",
            ResourceAction::Create,
        ))
        .unwrap();

        let blast = blast_of(&plan);
        assert!(compute(&plan, &[], &[], &blast).is_empty());
    }

    #[test]
    fn test_exposure_recommends_cidr_restriction() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource(
            "aws_security_group.web",
            "aws_security_group",
            "",
            ResourceAction::Update,
        ))
        .unwrap();

        let exposures = vec![SecurityExposure {
            resource_address: "aws_security_group.web".to_string(),
            kind: ExposureKind::IngressCidr,
            port: Some(22),
            cidr: Some("0.0.0.0/0".to_string()),
            severity: Severity::High,
        }];
        let blast = blast_of(&plan);
        let recs = compute(&plan, &exposures, &[], &blast);
        assert_eq!(recs, vec!["restrict ingress to known CIDR ranges"]);
    }

    #[test]
    fn test_cross_module_change() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource(
            "module.net.aws_subnet.a",
            "aws_subnet",
            "module.net",
            ResourceAction::Update,
        ))
        .unwrap();
        plan.push(resource(
            "module.app.aws_instance.web",
            "aws_instance",
            "module.app",
            ResourceAction::Update,
        ))
        .unwrap();

        let blast = blast_of(&plan);
        let recs = compute(&plan, &[], &[], &blast);
        assert_eq!(
            recs,
            vec!["cross-module change, coordinate with module owners"]
        );
    }

    #[test]
    fn test_rules_fire_in_declaration_order() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource(
            "aws_db_instance.prod",
            "aws_db_instance",
            "",
            ResourceAction::Delete,
        ))
        .unwrap();
        plan.push(resource(
            "aws_security_group.web",
            "aws_security_group",
            "",
            ResourceAction::Update,
        ))
        .unwrap();

        let exposures = vec![SecurityExposure {
            resource_address: "aws_security_group.web".to_string(),
            kind: ExposureKind::IngressCidr,
            port: Some(22),
            cidr: Some("0.0.0.0/0".to_string()),
            severity: Severity::High,
        }];
        let blast = blast_of(&plan);
        let recs = compute(&plan, &exposures, &[], &blast);
        assert_eq!(
            recs,
            vec![
                "verify backup before proceeding",
                "restrict ingress to known CIDR ranges"
            ]
        );
    }

    #[test]
    fn test_shared_critical_modification() {
        let mut plan = NormalizedPlan::new();
        plan.push(resource("aws_vpc.main", "aws_vpc", "", ResourceAction::Update))
            .unwrap();

        let shared = vec![SharedResource {
            address: "aws_vpc.main".to_string(),
            is_critical: true,
        }];
        let blast = blast_of(&plan);
        let recs = compute(&plan, &[], &shared, &blast);
        assert_eq!(recs, vec!["apply in stages to reduce blast radius"]);
    }
}
