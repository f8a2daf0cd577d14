// Policy document and evaluation result types

use serde::{Deserialize, Serialize};

use crate::engines::shared::models::{ResourceAction, RiskLevel};

/// Policy document loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PolicyDocument {
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

/// One declarative rule: all present conditions must hold for the rule to
/// match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "match", default)]
    pub match_conditions: MatchConditions,
    pub action: PolicyAction,
}

/// AND-combined match block; absent conditions match anything
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MatchConditions {
    pub explanation_id: Option<String>,
    pub risk_level: Option<Vec<RiskLevel>>,
    pub action_type: Option<Vec<ResourceAction>>,
    pub has_sensitive_deletions: Option<bool>,
    pub has_security_exposures: Option<bool>,
}

/// What a matched rule does
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Fail,
    Warn,
}

/// How policy failures translate to exit codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementMode {
    /// A failed rule blocks the pipeline (exit 2)
    Auto,
    /// A failed rule requires manual approval (exit 3)
    Manual,
}

/// A rule that matched during evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleHit {
    pub rule_id: String,
    pub description: String,
    pub action: PolicyAction,
}

/// Outcome of evaluating a policy document against one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyEvaluationResult {
    /// True iff no `fail` rule matched
    pub passed: bool,
    pub failure_count: usize,
    pub warning_count: usize,
    pub rule_hits: Vec<RuleHit>,
}

impl PolicyEvaluationResult {
    /// Exit-code translation: warnings never alter the exit code
    pub fn exit_code(&self, mode: EnforcementMode) -> i32 {
        if self.passed {
            0
        } else {
            match mode {
                EnforcementMode::Auto => 2,
                EnforcementMode::Manual => 3,
            }
        }
    }
}
