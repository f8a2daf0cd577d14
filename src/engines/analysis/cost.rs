// Cost checks: high-cost creations and instance scale-ups

use serde_json::Value;

use crate::config::{type_matches, CostAlertsConfig};
use crate::engines::shared::models::{CostAlert, CostAlertKind, NormalizedPlan, ResourceAction};

/// Detect cost-relevant changes: creations of high-cost types, creations of
/// high-cost instance types, and updates that move an instance up the
/// configured cost-tier ladder.
pub fn detect(plan: &NormalizedPlan, config: &CostAlertsConfig) -> Vec<CostAlert> {
    let mut alerts = Vec::new();

    for resource in &plan.resources {
        match resource.action {
            ResourceAction::Create => {
                if config
                    .high_cost_types
                    .iter()
                    .any(|p| type_matches(p, &resource.resource_type))
                {
                    alerts.push(CostAlert {
                        resource_address: resource.address.clone(),
                        kind: CostAlertKind::HighCostCreate,
                        details: format!(
                            "{} is a high-cost resource type",
                            resource.resource_type
                        ),
                    });
                }

                if let Some(instance_type) = instance_type(resource.after.as_ref()) {
                    // exact set membership: entries are concrete instance
                    // types, unlike the pattern-capable resource-type lists
                    if config
                        .high_cost_instance_types
                        .iter()
                        .any(|t| t == instance_type)
                    {
                        alerts.push(CostAlert {
                            resource_address: resource.address.clone(),
                            kind: CostAlertKind::HighCostInstanceCreate,
                            details: format!("{} is a high-cost instance type", instance_type),
                        });
                    }
                }
            }
            ResourceAction::Update => {
                let before_type = instance_type(resource.before.as_ref());
                let after_type = instance_type(resource.after.as_ref());
                if let (Some(before), Some(after)) = (before_type, after_type) {
                    let before_tier = tier_index(before, &config.instance_cost_tiers);
                    let after_tier = tier_index(after, &config.instance_cost_tiers);
                    if let (Some(b), Some(a)) = (before_tier, after_tier) {
                        if a > b {
                            alerts.push(CostAlert {
                                resource_address: resource.address.clone(),
                                kind: CostAlertKind::InstanceScaleUp,
                                details: format!("{} -> {}", before, after),
                            });
                        }
                    }
                }
            }
            _ => {}
        }
    }

    tracing::debug!(count = alerts.len(), "cost scan complete");
    alerts
}

fn instance_type(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(|v| v.get("instance_type"))
        .and_then(Value::as_str)
}

/// Position of the longest matching prefix in the ordered tier list
fn tier_index(instance_type: &str, tiers: &[String]) -> Option<usize> {
    tiers
        .iter()
        .enumerate()
        .filter(|(_, prefix)| instance_type.starts_with(prefix.as_str()))
        .max_by_key(|(_, prefix)| prefix.len())
        .map(|(index, _)| index)
}
