// Policy document loading

use std::fs;
use std::path::Path;

use super::policy_types::PolicyDocument;
use crate::engines::shared::error_model::{PreApplyError, Result};

/// Load a policy document from YAML
pub fn load_policy<P: AsRef<Path>>(path: P) -> Result<PolicyDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        PreApplyError::policy_load(format!("cannot read '{}': {}", path.display(), e))
    })?;
    parse_policy(&content)
}

pub fn parse_policy(content: &str) -> Result<PolicyDocument> {
    serde_yaml::from_str(content)
        .map_err(|e| PreApplyError::policy_load(format!("invalid policy YAML: {}", e)))
}
