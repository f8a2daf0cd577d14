// State-destructive updates: transitions that weaken data protection

use serde_json::Value;

use crate::engines::shared::models::{
    NormalizedPlan, ProtectionAttribute, ResourceAction, StateDestructiveUpdate,
};

/// Database-style types whose deletion_protection / backup retention
/// attributes are meaningful
const PROTECTED_DB_TYPES: [&str; 7] = [
    "aws_db_instance",
    "aws_rds_cluster",
    "aws_rds_cluster_instance",
    "aws_dynamodb_table",
    "aws_redshift_cluster",
    "aws_docdb_cluster",
    "aws_neptune_cluster",
];

/// Detect protection-weakening transitions on updates and deletes:
/// `force_destroy` false→true, `prevent_destroy` true→false, and for
/// database types `deletion_protection` true→false or a positive
/// `backup_retention_period` dropping to zero.
pub fn detect(plan: &NormalizedPlan, raw_plan: &Value) -> Vec<StateDestructiveUpdate> {
    let mut updates = Vec::new();

    for resource in &plan.resources {
        if !matches!(resource.action, ResourceAction::Update | ResourceAction::Delete) {
            continue;
        }

        let before = resource.before.as_ref();
        let after = resource.after.as_ref();

        // force_destroy: an absent before-value is the provider default false
        let force_before = root_bool(before, "force_destroy").unwrap_or(false);
        if let Some(true) = root_bool(after, "force_destroy") {
            if !force_before {
                updates.push(StateDestructiveUpdate {
                    resource_address: resource.address.clone(),
                    attribute: ProtectionAttribute::ForceDestroy,
                    before: Value::Bool(force_before),
                    after: Value::Bool(true),
                });
            }
        }

        // prevent_destroy: meta-argument, visible on the state maps or as
        // the desired value in the configuration subtree
        let prevent_before = prevent_destroy_value(before);
        let prevent_after = prevent_destroy_value(after)
            .or_else(|| configured_prevent_destroy(raw_plan, &resource.address));
        if prevent_before == Some(true) && prevent_after == Some(false) {
            updates.push(StateDestructiveUpdate {
                resource_address: resource.address.clone(),
                attribute: ProtectionAttribute::PreventDestroy,
                before: Value::Bool(true),
                after: Value::Bool(false),
            });
        }

        if PROTECTED_DB_TYPES.contains(&resource.resource_type.as_str()) {
            if root_bool(before, "deletion_protection") == Some(true)
                && root_bool(after, "deletion_protection") == Some(false)
            {
                updates.push(StateDestructiveUpdate {
                    resource_address: resource.address.clone(),
                    attribute: ProtectionAttribute::DeletionProtection,
                    before: Value::Bool(true),
                    after: Value::Bool(false),
                });
            }

            let retention_before = root_u64(before, "backup_retention_period");
            let retention_after = root_u64(after, "backup_retention_period");
            if let (Some(b), Some(0)) = (retention_before, retention_after) {
                if b > 0 {
                    updates.push(StateDestructiveUpdate {
                        resource_address: resource.address.clone(),
                        attribute: ProtectionAttribute::DeletionProtection,
                        before: Value::from(b),
                        after: Value::from(0u64),
                    });
                }
            }
        }
    }

    tracing::debug!(count = updates.len(), "state-destructive scan complete");
    updates
}

fn root_bool(value: Option<&Value>, key: &str) -> Option<bool> {
    value.and_then(|v| v.get(key)).and_then(Value::as_bool)
}

fn root_u64(value: Option<&Value>, key: &str) -> Option<u64> {
    value.and_then(|v| v.get(key)).and_then(Value::as_u64)
}

/// prevent_destroy on a state map, either flat or inside a lifecycle block
fn prevent_destroy_value(value: Option<&Value>) -> Option<bool> {
    let value = value?;
    if let Some(flag) = value.get("prevent_destroy").and_then(Value::as_bool) {
        return Some(flag);
    }
    match value.get("lifecycle") {
        Some(Value::Array(blocks)) => blocks
            .first()
            .and_then(|b| b.get("prevent_destroy"))
            .and_then(Value::as_bool),
        Some(block @ Value::Object(_)) => {
            block.get("prevent_destroy").and_then(Value::as_bool)
        }
        _ => None,
    }
}

/// prevent_destroy declared in the configuration subtree for an address
fn configured_prevent_destroy(raw_plan: &Value, address: &str) -> Option<bool> {
    let root = raw_plan.get("configuration")?.get("root_module")?;
    find_config_entry(root, "", address)
        .and_then(|entry| prevent_destroy_value(Some(entry)))
}

fn find_config_entry<'a>(module: &'a Value, prefix: &str, address: &str) -> Option<&'a Value> {
    if let Some(resources) = module.get("resources").and_then(Value::as_array) {
        for entry in resources {
            let Some(local) = entry.get("address").and_then(Value::as_str) else {
                continue;
            };
            let full = if prefix.is_empty() {
                local.to_string()
            } else {
                format!("{}.{}", prefix, local)
            };
            if full == address {
                return Some(entry);
            }
        }
    }
    if let Some(calls) = module.get("module_calls").and_then(Value::as_object) {
        for (name, call) in calls {
            let child_prefix = if prefix.is_empty() {
                format!("module.{}", name)
            } else {
                format!("{}.module.{}", prefix, name)
            };
            if let Some(found) = call
                .get("module")
                .and_then(|child| find_config_entry(child, &child_prefix, address))
            {
                return Some(found);
            }
        }
    }
    None
}
