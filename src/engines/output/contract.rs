// Versioned output contract emitted at the analysis boundary

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::RiskConfig;
use crate::engines::analysis::{BlastRadius, RiskScore, SharedResource};
use crate::engines::shared::error_model::{PreApplyError, Result};
use crate::engines::shared::models::{
    ApprovalLevel, CostAlert, Dimension, NormalizedPlan, ResourceAction, RiskGateAction,
    RiskLevel, RiskTier, SecurityExposure,
};

/// Contract schema version
pub const OUTPUT_VERSION: &str = "1.0";

/// Per-dimension breakdown of the score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub primary_dimension: Dimension,
    pub dimensions: DimensionBreakdown,
    pub interaction_multiplier: f64,
    pub blast_contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionBreakdown {
    pub data: f64,
    pub security: f64,
    pub infrastructure: f64,
    pub cost: f64,
}

/// Everything that contributed to the risk assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAttributes {
    /// Affected-resource count (the blast radius measurement)
    pub blast_radius: usize,
    pub shared_dependencies: Vec<String>,
    pub critical_infrastructure: Vec<String>,
    pub sensitive_deletions: Vec<String>,
    pub security_exposures: Vec<SecurityExposure>,
    pub cost_alerts: Vec<CostAlert>,
    pub action_types: Vec<String>,
    pub risk_breakdown: RiskBreakdown,
}

/// The versioned record emitted at the boundary. Field order is the wire
/// order; every array is sorted so identical inputs serialize to identical
/// bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreOutput {
    pub version: String,
    pub explanation_id: String,
    pub risk_level: RiskLevel,
    pub risk_level_detailed: RiskTier,
    /// Final risk score
    pub blast_radius_score: f64,
    pub risk_action: RiskGateAction,
    pub approval_required: ApprovalLevel,
    pub affected_count: usize,
    pub deletion_count: usize,
    pub affected_components: Vec<String>,
    pub risk_attributes: RiskAttributes,
    pub recommendations: Vec<String>,
}

impl CoreOutput {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PreApplyError::invariant("contract-serialization", format!("cannot serialize: {}", e))
        })
    }
}

/// Stable report identifier: truncated SHA-256 over the raw plan bytes
pub fn explanation_id(plan_bytes: &[u8]) -> String {
    let digest = Sha256::digest(plan_bytes);
    let hex: String = digest.iter().take(6).map(|b| format!("{:02x}", b)).collect();
    format!("pa-{}", hex)
}

/// Round to two decimals at the contract boundary so floating-point noise
/// never reaches the wire
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[allow(clippy::too_many_arguments)]
pub fn build(
    plan_bytes: &[u8],
    plan: &NormalizedPlan,
    exposures: &[SecurityExposure],
    cost_alerts: &[CostAlert],
    shared: &[SharedResource],
    blast: &BlastRadius,
    score: &RiskScore,
    recommendations: Vec<String>,
    config: &RiskConfig,
) -> CoreOutput {
    let mut sorted_exposures = exposures.to_vec();
    sorted_exposures.sort_by(|a, b| {
        a.resource_address
            .cmp(&b.resource_address)
            .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
            .then_with(|| a.port.cmp(&b.port))
            .then_with(|| a.cidr.cmp(&b.cidr))
    });

    let mut sorted_alerts = cost_alerts.to_vec();
    sorted_alerts.sort_by(|a, b| {
        a.resource_address
            .cmp(&b.resource_address)
            .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
            .then_with(|| a.details.cmp(&b.details))
    });

    let mut sensitive_deletions: Vec<String> = plan
        .resources
        .iter()
        .filter(|r| {
            r.action == ResourceAction::Delete
                && config.is_sensitive_delete_type(&r.resource_type)
        })
        .map(|r| r.address.clone())
        .collect();
    sensitive_deletions.sort();

    let shared_dependencies: Vec<String> =
        shared.iter().map(|s| s.address.clone()).collect();
    let critical_infrastructure: Vec<String> = shared
        .iter()
        .filter(|s| s.is_critical)
        .map(|s| s.address.clone())
        .collect();

    let mut action_types: Vec<String> = plan
        .resources
        .iter()
        .filter(|r| r.action.is_change())
        .map(|r| r.action.as_str().to_string())
        .collect();
    action_types.sort();
    action_types.dedup();

    let deletion_count = plan
        .resources
        .iter()
        .filter(|r| r.action == ResourceAction::Delete)
        .count();

    let tier = score.tier;

    CoreOutput {
        version: OUTPUT_VERSION.to_string(),
        explanation_id: explanation_id(plan_bytes),
        risk_level: tier.project(),
        risk_level_detailed: tier,
        blast_radius_score: round2(score.score),
        risk_action: tier.action(),
        approval_required: tier.approval(),
        affected_count: blast.affected_count,
        deletion_count,
        affected_components: blast.affected_components.clone(),
        risk_attributes: RiskAttributes {
            blast_radius: blast.affected_count,
            shared_dependencies,
            critical_infrastructure,
            sensitive_deletions,
            security_exposures: sorted_exposures,
            cost_alerts: sorted_alerts,
            action_types,
            risk_breakdown: RiskBreakdown {
                primary_dimension: score.primary,
                dimensions: DimensionBreakdown {
                    data: round2(score.dimensions.data),
                    security: round2(score.dimensions.security),
                    infrastructure: round2(score.dimensions.infrastructure),
                    cost: round2(score.dimensions.cost),
                },
                interaction_multiplier: round2(score.interaction_multiplier),
                blast_contribution: round2(score.blast_contribution),
            },
        },
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explanation_id_is_stable() {
        let a = explanation_id(b"{\"format_version\":\"1.2\"}");
        let b = explanation_id(b"{\"format_version\":\"1.2\"}");
        assert_eq!(a, b);
        assert!(a.starts_with("pa-"));
        assert_eq!(a.len(), 15);
    }

    #[test]
    fn test_explanation_id_differs_per_plan() {
        assert_ne!(explanation_id(b"a"), explanation_id(b"b"));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(74.349625), 74.35);
        assert_eq!(round2(85.0), 85.0);
        assert_eq!(round2(0.0), 0.0);
    }
}
