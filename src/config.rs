// Configuration loading for PreApply
//
// All tunable behavior lives here: scoring weights, decay factors,
// interaction bonuses, tier thresholds, shared/critical resource lists, and
// cost alert lists. The configuration is read once at startup and passed as
// an immutable argument to every stage.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::engines::shared::error_model::{PreApplyError, Result};

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "preapply.yaml";

/// Environment variable overriding the default configuration path
pub const CONFIG_ENV_VAR: &str = "PREAPPLY_CONFIG";

/// Root configuration document
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    pub risk_scoring: RiskScoring,
    pub shared_resources: SharedResourcesConfig,
    pub cost_alerts: CostAlertsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RiskScoring {
    pub data_loss: DataLossWeights,
    pub security: SecurityWeights,
    pub infrastructure: InfrastructureWeights,
    pub cost: CostWeights,
    pub interactions: InteractionConfig,
    pub blast_radius: BlastRadiusConfig,
    pub thresholds: TierThresholds,
}

/// Data-loss dimension weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataLossWeights {
    pub base_weight: f64,
    pub decay_factor: f64,
    /// Action weight for state-destructive updates relative to deletions
    pub state_destructive_multiplier: f64,
}

impl Default for DataLossWeights {
    fn default() -> Self {
        Self {
            base_weight: 50.0,
            decay_factor: 0.85,
            state_destructive_multiplier: 0.6,
        }
    }
}

/// Security dimension weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityWeights {
    pub base_weight: f64,
    pub decay_factor: f64,
    pub sensitive_port_penalty: f64,
    pub sensitive_ports: Vec<u16>,
}

impl Default for SecurityWeights {
    fn default() -> Self {
        Self {
            base_weight: 40.0,
            decay_factor: 0.90,
            sensitive_port_penalty: 20.0,
            sensitive_ports: vec![22, 3389, 1433, 3306, 5432, 5439, 27017],
        }
    }
}

/// Infrastructure dimension weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InfrastructureWeights {
    pub shared_resource_base: f64,
    pub critical_multiplier: f64,
}

impl Default for InfrastructureWeights {
    fn default() -> Self {
        Self {
            shared_resource_base: 30.0,
            critical_multiplier: 1.3,
        }
    }
}

/// Cost dimension weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CostWeights {
    pub creation_weight: f64,
    pub scaling_weight: f64,
    pub decay_factor: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            creation_weight: 15.0,
            scaling_weight: 10.0,
            decay_factor: 0.90,
        }
    }
}

/// One pairwise interaction bonus: both dimensions must reach their
/// threshold for the bonus to apply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairwiseBonus {
    pub dimensions: [String; 2],
    pub thresholds: [f64; 2],
    pub bonus: f64,
}

impl PairwiseBonus {
    fn new(a: &str, ta: f64, b: &str, tb: f64, bonus: f64) -> Self {
        Self {
            dimensions: [a.to_string(), b.to_string()],
            thresholds: [ta, tb],
            bonus,
        }
    }
}

/// Interaction multiplier configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    pub pairwise: Vec<PairwiseBonus>,
    pub perfect_storm_threshold: f64,
    pub perfect_storm_bonus: f64,
    pub two_dim_bonus: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            pairwise: vec![
                PairwiseBonus::new("data", 40.0, "security", 40.0, 0.35),
                PairwiseBonus::new("infrastructure", 60.0, "security", 40.0, 0.30),
                PairwiseBonus::new("data", 40.0, "infrastructure", 60.0, 0.25),
                PairwiseBonus::new("cost", 30.0, "infrastructure", 60.0, 0.20),
            ],
            perfect_storm_threshold: 35.0,
            perfect_storm_bonus: 0.40,
            two_dim_bonus: 0.15,
        }
    }
}

/// Context weights for the blast term, keyed by primary dimension
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlastWeights {
    pub data: f64,
    pub security: f64,
    pub infrastructure: f64,
    pub cost: f64,
}

impl Default for BlastWeights {
    fn default() -> Self {
        Self {
            data: 0.2,
            security: 0.4,
            infrastructure: 1.0,
            cost: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BlastRadiusConfig {
    pub weights: BlastWeights,
}

/// Score thresholds for the six-tier classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TierThresholds {
    pub critical_catastrophic: f64,
    pub critical: f64,
    pub high_severe: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            critical_catastrophic: 200.0,
            critical: 150.0,
            high_severe: 100.0,
            high: 70.0,
            medium: 40.0,
        }
    }
}

/// Shared-resource detector configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SharedResourcesConfig {
    /// Provider types treated as critical infrastructure. A trailing '*'
    /// makes an entry a prefix pattern (e.g. "aws_rds_*").
    pub critical_types: Vec<String>,
    /// Deleting one of these types counts as a sensitive deletion
    pub sensitive_delete_types: Vec<String>,
}

impl Default for SharedResourcesConfig {
    fn default() -> Self {
        Self {
            critical_types: vec![
                "aws_vpc".to_string(),
                "aws_lb".to_string(),
                "aws_alb".to_string(),
                "aws_elb".to_string(),
                "aws_nat_gateway".to_string(),
                "aws_internet_gateway".to_string(),
                "aws_db_instance".to_string(),
                "aws_rds_*".to_string(),
                "aws_elasticache_*".to_string(),
            ],
            sensitive_delete_types: vec![
                "aws_db_instance".to_string(),
                "aws_rds_*".to_string(),
                "aws_s3_bucket".to_string(),
                "aws_dynamodb_table".to_string(),
                "aws_ebs_volume".to_string(),
                "aws_efs_file_system".to_string(),
            ],
        }
    }
}

/// Cost alert configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CostAlertsConfig {
    pub high_cost_types: Vec<String>,
    pub high_cost_instance_types: Vec<String>,
    /// Ordered instance-type prefixes; the position in this list is the cost
    /// tier. An update whose tier index strictly increases is a scale-up.
    pub instance_cost_tiers: Vec<String>,
}

impl Default for CostAlertsConfig {
    fn default() -> Self {
        Self {
            high_cost_types: vec![
                "aws_nat_gateway".to_string(),
                "aws_eks_cluster".to_string(),
                "aws_rds_cluster".to_string(),
                "aws_redshift_cluster".to_string(),
                "aws_elasticache_cluster".to_string(),
                "aws_cloudhsm_v2_cluster".to_string(),
                "aws_sagemaker_endpoint".to_string(),
            ],
            high_cost_instance_types: vec![
                "p3.2xlarge".to_string(),
                "p3.8xlarge".to_string(),
                "p3.16xlarge".to_string(),
                "p4d.24xlarge".to_string(),
                "x1.16xlarge".to_string(),
                "x1.32xlarge".to_string(),
                "x1e.32xlarge".to_string(),
                "u-6tb1.metal".to_string(),
                "r5.24xlarge".to_string(),
                "m5.24xlarge".to_string(),
            ],
            instance_cost_tiers: vec![
                "t2".to_string(),
                "t3a".to_string(),
                "t3".to_string(),
                "t4g".to_string(),
                "m5".to_string(),
                "m6i".to_string(),
                "c5".to_string(),
                "c6i".to_string(),
                "r5".to_string(),
                "r6i".to_string(),
                "i3".to_string(),
                "x1".to_string(),
                "p3".to_string(),
                "p4d".to_string(),
                "u-".to_string(),
            ],
        }
    }
}

/// Match a provider type against a configured entry. A trailing '*' makes
/// the entry a prefix pattern; otherwise the match is exact.
pub fn type_matches(pattern: &str, resource_type: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => resource_type.starts_with(prefix),
        None => resource_type == pattern,
    }
}

impl RiskConfig {
    /// Whether a provider type counts as critical infrastructure
    pub fn is_critical_type(&self, resource_type: &str) -> bool {
        self.shared_resources
            .critical_types
            .iter()
            .any(|p| type_matches(p, resource_type))
    }

    /// Whether deleting a provider type counts as a sensitive deletion
    pub fn is_sensitive_delete_type(&self, resource_type: &str) -> bool {
        self.shared_resources
            .sensitive_delete_types
            .iter()
            .any(|p| type_matches(p, resource_type))
    }
}

/// Load configuration.
///
/// An explicit path (from `--config` or `PREAPPLY_CONFIG`) must exist and
/// parse; a missing default file falls back to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<RiskConfig> {
    match explicit {
        Some(path) => load_config_from_path(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                load_config_from_path(default)
            } else {
                Ok(RiskConfig::default())
            }
        }
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<RiskConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        PreApplyError::config_load(format!("cannot read '{}': {}", path.display(), e))
    })?;
    parse_config(&content)
}

/// Parse a configuration document, applying the legacy migration when the
/// `risk_scoring` key is absent but legacy top-level keys are present.
pub fn parse_config(content: &str) -> Result<RiskConfig> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| PreApplyError::config_load(format!("invalid YAML: {}", e)))?;

    if value.is_null() {
        return Ok(RiskConfig::default());
    }

    if !value.is_mapping() {
        return Err(PreApplyError::config_load(
            "configuration root must be a mapping",
        ));
    }

    let has_risk_scoring = value.get("risk_scoring").is_some();
    let has_legacy = value.get("blast_radius").is_some() || value.get("shared_resources").is_some();

    if !has_risk_scoring && has_legacy {
        return migrate_legacy(&value);
    }

    serde_yaml::from_value(value)
        .map_err(|e| PreApplyError::config_load(format!("configuration schema mismatch: {}", e)))
}

/// One-shot migration for pre-`risk_scoring` documents: scoring weights take
/// built-in defaults, the legacy `shared_resources` lists are carried over.
fn migrate_legacy(value: &serde_yaml::Value) -> Result<RiskConfig> {
    let mut config = RiskConfig::default();

    if let Some(shared) = value.get("shared_resources") {
        config.shared_resources = serde_yaml::from_value(shared.clone()).map_err(|e| {
            PreApplyError::config_load(format!("legacy shared_resources schema mismatch: {}", e))
        })?;
    }
    if let Some(cost) = value.get("cost_alerts") {
        config.cost_alerts = serde_yaml::from_value(cost.clone()).map_err(|e| {
            PreApplyError::config_load(format!("legacy cost_alerts schema mismatch: {}", e))
        })?;
    }

    Ok(config)
}
