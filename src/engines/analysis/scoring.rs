// Risk scoring: stacking decay, interaction multipliers, blast term, tiering

use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;
use crate::engines::analysis::blast_radius::BlastRadius;
use crate::engines::graph::DependencyGraph;
use crate::engines::shared::models::{
    CostAlert, CostAlertKind, Dimension, DimensionScores, NormalizedPlan, ResourceAction,
    RiskTier, SecurityExposure, StateDestructiveUpdate,
};

/// Scored outcome of an analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    pub dimensions: DimensionScores,
    pub primary: Dimension,
    pub interaction_multiplier: f64,
    pub blast_contribution: f64,
    pub score: f64,
    pub tier: RiskTier,
}

/// Compute the multi-dimensional risk score.
pub fn compute(
    graph: &DependencyGraph,
    plan: &NormalizedPlan,
    exposures: &[SecurityExposure],
    destructive: &[StateDestructiveUpdate],
    cost_alerts: &[CostAlert],
    blast: &BlastRadius,
    config: &RiskConfig,
) -> RiskScore {
    let dimensions = DimensionScores {
        data: data_dimension(plan, destructive, config),
        security: security_dimension(exposures, config),
        infrastructure: infrastructure_dimension(graph, plan, config),
        cost: cost_dimension(cost_alerts, config),
    };

    let interaction_multiplier = interaction_multiplier(&dimensions, config);
    let primary = dimensions.primary();

    // A plan that contributes to no dimension scores exactly zero; the
    // blast term only amplifies existing risk
    let blast_contribution = if dimensions.all_zero() {
        0.0
    } else {
        let blast_term = 10.0 * ((blast.affected_count as f64) + 1.0).log2();
        let weights = &config.risk_scoring.blast_radius.weights;
        let context_weight = match primary {
            Dimension::Data => weights.data,
            Dimension::Security => weights.security,
            Dimension::Infrastructure => weights.infrastructure,
            Dimension::Cost => weights.cost,
        };
        blast_term * context_weight
    };

    let score = dimensions.max_value() * (1.0 + interaction_multiplier) + blast_contribution;
    let tier = classify(score, config);

    tracing::debug!(
        data = dimensions.data,
        security = dimensions.security,
        infrastructure = dimensions.infrastructure,
        cost = dimensions.cost,
        score,
        tier = tier.as_str(),
        "risk score computed"
    );

    RiskScore {
        dimensions,
        primary,
        interaction_multiplier,
        blast_contribution,
        score,
        tier,
    }
}

/// Geometrically decayed sum: contributions sorted by descending weight
/// (ties broken by ascending address for stability), the i-th weight scaled
/// by decay^i.
fn decayed_sum(mut items: Vec<(f64, String)>, decay: f64) -> f64 {
    items.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });
    items
        .iter()
        .enumerate()
        .map(|(i, (weight, _))| weight * decay.powi(i as i32))
        .sum()
}

/// Data-loss dimension: deletions at full action weight, state-destructive
/// updates at the configured fraction.
fn data_dimension(
    plan: &NormalizedPlan,
    destructive: &[StateDestructiveUpdate],
    config: &RiskConfig,
) -> f64 {
    let weights = &config.risk_scoring.data_loss;
    let mut items: Vec<(f64, String)> = Vec::new();

    for resource in &plan.resources {
        if resource.action == ResourceAction::Delete {
            items.push((weights.base_weight, resource.address.clone()));
        }
    }
    for update in destructive {
        items.push((
            weights.base_weight * weights.state_destructive_multiplier,
            update.resource_address.clone(),
        ));
    }

    decayed_sum(items, weights.decay_factor)
}

/// Security dimension: one contribution per exposure, with the sensitive
/// port penalty when the exposure covers a sensitive port.
fn security_dimension(exposures: &[SecurityExposure], config: &RiskConfig) -> f64 {
    let weights = &config.risk_scoring.security;
    let items: Vec<(f64, String)> = exposures
        .iter()
        .map(|exposure| {
            let penalty = match exposure.port {
                Some(port) if weights.sensitive_ports.contains(&port) => {
                    weights.sensitive_port_penalty
                }
                _ => 0.0,
            };
            (weights.base_weight + penalty, exposure.resource_address.clone())
        })
        .collect();

    decayed_sum(items, weights.decay_factor)
}

/// Infrastructure dimension: resources other resources depend on, when they
/// are changed themselves or a direct dependent is changed. No decay; the
/// per-resource weights sum directly.
fn infrastructure_dimension(
    graph: &DependencyGraph,
    plan: &NormalizedPlan,
    config: &RiskConfig,
) -> f64 {
    let weights = &config.risk_scoring.infrastructure;
    let mut total = 0.0;

    for resource in &plan.resources {
        if graph.in_degree(&resource.address) == 0 {
            continue;
        }
        let dependent_changed = graph
            .dependents(&resource.address)
            .any(|d| plan.get(d).is_some_and(|r| r.action.is_change()));
        if !resource.action.is_change() && !dependent_changed {
            continue;
        }

        let criticality = if config.is_critical_type(&resource.resource_type) {
            weights.critical_multiplier
        } else {
            1.0
        };
        let action_multiplier = match resource.action {
            ResourceAction::Delete => 2.0,
            ResourceAction::Update => 1.5,
            _ => 1.0,
        };

        total += weights.shared_resource_base * criticality * action_multiplier;
    }

    total
}

/// Cost dimension: creation alerts at the creation weight, scale-ups at the
/// scaling weight.
fn cost_dimension(alerts: &[CostAlert], config: &RiskConfig) -> f64 {
    let weights = &config.risk_scoring.cost;
    let items: Vec<(f64, String)> = alerts
        .iter()
        .map(|alert| {
            let weight = match alert.kind {
                CostAlertKind::HighCostCreate | CostAlertKind::HighCostInstanceCreate => {
                    weights.creation_weight
                }
                CostAlertKind::InstanceScaleUp => weights.scaling_weight,
            };
            (weight, alert.resource_address.clone())
        })
        .collect();

    decayed_sum(items, weights.decay_factor)
}

/// Additive interaction multiplier. Pairwise bonuses stack with each other
/// and with the perfect-storm bonus; the two-dimension bonus is a fallback
/// for elevated plans no pairwise rule already amplified.
pub fn interaction_multiplier(dimensions: &DimensionScores, config: &RiskConfig) -> f64 {
    let interactions = &config.risk_scoring.interactions;
    let mut multiplier = 0.0;
    let mut pairwise_fired = false;

    for pair in &interactions.pairwise {
        let (Some(first), Some(second)) = (
            dimension_by_name(&pair.dimensions[0]),
            dimension_by_name(&pair.dimensions[1]),
        ) else {
            continue;
        };
        if dimensions.get(first) >= pair.thresholds[0]
            && dimensions.get(second) >= pair.thresholds[1]
        {
            multiplier += pair.bonus;
            pairwise_fired = true;
        }
    }

    let elevated = dimensions.count_at_or_above(interactions.perfect_storm_threshold);
    if elevated >= 3 {
        multiplier += interactions.perfect_storm_bonus;
    } else if elevated == 2 && !pairwise_fired {
        multiplier += interactions.two_dim_bonus;
    }

    multiplier
}

fn dimension_by_name(name: &str) -> Option<Dimension> {
    match name {
        "data" => Some(Dimension::Data),
        "security" => Some(Dimension::Security),
        "infrastructure" => Some(Dimension::Infrastructure),
        "cost" => Some(Dimension::Cost),
        _ => None,
    }
}

/// Map a score onto the six-tier classification
pub fn classify(score: f64, config: &RiskConfig) -> RiskTier {
    let thresholds = &config.risk_scoring.thresholds;
    if score >= thresholds.critical_catastrophic {
        RiskTier::CriticalCatastrophic
    } else if score >= thresholds.critical {
        RiskTier::Critical
    } else if score >= thresholds.high_severe {
        RiskTier::HighSevere
    } else if score >= thresholds.high {
        RiskTier::High
    } else if score >= thresholds.medium {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::shared::models::{ExposureKind, Severity};

    fn config() -> RiskConfig {
        RiskConfig::default()
    }

    #[test]
    fn test_decayed_sum_orders_by_weight_then_address() {
        // 50 + 50*0.85 + 30*0.85^2
        let total = decayed_sum(
            vec![
                (30.0, "c".to_string()),
                (50.0, "b".to_string()),
                (50.0, "a".to_string()),
            ],
            0.85,
        );
        assert!((total - (50.0 + 42.5 + 21.675)).abs() < 1e-9);
    }

    #[test]
    fn test_decayed_sum_tie_break_is_stable() {
        let a = decayed_sum(
            vec![(40.0, "x".to_string()), (40.0, "y".to_string())],
            0.9,
        );
        let b = decayed_sum(
            vec![(40.0, "y".to_string()), (40.0, "x".to_string())],
            0.9,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_security_dimension_with_port_penalty() {
        let exposures = vec![SecurityExposure {
            resource_address: "aws_security_group.web".to_string(),
            kind: ExposureKind::IngressCidr,
            port: Some(22),
            cidr: Some("0.0.0.0/0".to_string()),
            severity: Severity::High,
        }];
        assert_eq!(security_dimension(&exposures, &config()), 60.0);
    }

    #[test]
    fn test_security_dimension_without_penalty() {
        let exposures = vec![SecurityExposure {
            resource_address: "aws_s3_bucket.open".to_string(),
            kind: ExposureKind::S3PublicAcl,
            port: None,
            cidr: None,
            severity: Severity::High,
        }];
        assert_eq!(security_dimension(&exposures, &config()), 40.0);
    }

    #[test]
    fn test_pairwise_bonus_suppresses_two_dim_fallback() {
        let dimensions = DimensionScores {
            data: 50.0,
            security: 60.0,
            infrastructure: 0.0,
            cost: 0.0,
        };
        // data≥40 ∧ security≥40 fires; the two-elevated-dimensions fallback
        // must not stack on top
        assert_eq!(interaction_multiplier(&dimensions, &config()), 0.35);
    }

    #[test]
    fn test_two_dim_fallback_without_pairwise() {
        let dimensions = DimensionScores {
            data: 38.0,
            security: 38.0,
            infrastructure: 0.0,
            cost: 0.0,
        };
        // Both are ≥35 but below the 40/40 pairwise thresholds
        assert_eq!(interaction_multiplier(&dimensions, &config()), 0.15);
    }

    #[test]
    fn test_perfect_storm_stacks_with_pairwise() {
        let dimensions = DimensionScores {
            data: 114.0,
            security: 60.0,
            infrastructure: 58.0,
            cost: 0.0,
        };
        let multiplier = interaction_multiplier(&dimensions, &config());
        assert!((multiplier - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_no_elevation_no_multiplier() {
        let dimensions = DimensionScores {
            data: 10.0,
            security: 0.0,
            infrastructure: 0.0,
            cost: 0.0,
        };
        assert_eq!(interaction_multiplier(&dimensions, &config()), 0.0);
    }

    #[test]
    fn test_classify_thresholds() {
        let c = config();
        assert_eq!(classify(250.0, &c), RiskTier::CriticalCatastrophic);
        assert_eq!(classify(200.0, &c), RiskTier::CriticalCatastrophic);
        assert_eq!(classify(199.9, &c), RiskTier::Critical);
        assert_eq!(classify(150.0, &c), RiskTier::Critical);
        assert_eq!(classify(100.0, &c), RiskTier::HighSevere);
        assert_eq!(classify(70.0, &c), RiskTier::High);
        assert_eq!(classify(40.0, &c), RiskTier::Medium);
        assert_eq!(classify(39.9, &c), RiskTier::Low);
        assert_eq!(classify(0.0, &c), RiskTier::Low);
    }
}
