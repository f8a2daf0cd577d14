// Terraform plan JSON loader and shape validator

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::engines::shared::error_model::{PreApplyError, Result};

/// Read and validate a plan file, returning the raw bytes and the decoded
/// mapping unchanged. The bytes feed the stable report identifier.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, Value)> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        PreApplyError::plan_load(format!("cannot read '{}': {}", path.display(), e))
    })?;
    let plan = validate_plan_bytes(&bytes)?;
    Ok((bytes, plan))
}

/// Decode plan bytes and check the required top-level shape
pub fn validate_plan_bytes(bytes: &[u8]) -> Result<Value> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| PreApplyError::plan_load(format!("plan is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(PreApplyError::plan_load("plan root must be a JSON object"));
    }

    if value.get("format_version").and_then(Value::as_str).is_none() {
        return Err(PreApplyError::plan_structure(
            "plan is missing the 'format_version' string",
        ));
    }

    match value.get("resource_changes") {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(PreApplyError::plan_structure(
                "'resource_changes' must be an array",
            ))
        }
        None => {
            return Err(PreApplyError::plan_structure(
                "plan is missing 'resource_changes'",
            ))
        }
    }

    Ok(value)
}

/// The validated `resource_changes` array of a plan
pub fn resource_changes(plan: &Value) -> &[Value] {
    plan.get("resource_changes")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
