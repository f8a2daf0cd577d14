// Shared data models for PreApply

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::error_model::{PreApplyError, Result};

/// Normalized change action for a resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceAction {
    Create,
    Update,
    Delete,
    Read,
    NoOp,
}

impl ResourceAction {
    /// Normalize Terraform's action verb sequence.
    ///
    /// Any sequence containing "delete" collapses to Delete (destructive
    /// precedence for replace plans), then "update", then "create". An empty
    /// sequence or ["no-op"] is NoOp.
    pub fn from_verbs(verbs: &[String]) -> Self {
        if verbs.is_empty() {
            return ResourceAction::NoOp;
        }
        if verbs.iter().any(|v| v == "delete") {
            return ResourceAction::Delete;
        }
        if verbs.iter().any(|v| v == "update") {
            return ResourceAction::Update;
        }
        if verbs.iter().any(|v| v == "create") {
            return ResourceAction::Create;
        }
        if verbs.iter().any(|v| v == "read") {
            return ResourceAction::Read;
        }
        ResourceAction::NoOp
    }

    /// Whether this action changes real infrastructure
    pub fn is_change(self) -> bool {
        matches!(
            self,
            ResourceAction::Create | ResourceAction::Update | ResourceAction::Delete
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceAction::Create => "CREATE",
            ResourceAction::Update => "UPDATE",
            ResourceAction::Delete => "DELETE",
            ResourceAction::Read => "READ",
            ResourceAction::NoOp => "NO_OP",
        }
    }
}

/// A resource entry after normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedResource {
    /// Resource address minus the module prefix (bracketed index kept verbatim)
    pub id: String,
    /// Module path, empty for root resources
    pub module: String,
    /// Provider resource type
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Fully-qualified address used as the graph key
    pub address: String,
    pub action: ResourceAction,
    /// Addresses this resource depends on (declared + inferred)
    pub depends_on: BTreeSet<String>,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
}

/// Ordered resource list with a unique address index
#[derive(Debug, Clone, Default)]
pub struct NormalizedPlan {
    pub resources: Vec<NormalizedResource>,
    index: HashMap<String, usize>,
}

impl NormalizedPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource, enforcing address uniqueness
    pub fn push(&mut self, resource: NormalizedResource) -> Result<()> {
        if self.index.contains_key(&resource.address) {
            return Err(PreApplyError::invariant(
                "unique-addresses",
                format!("duplicate resource address '{}'", resource.address),
            ));
        }
        self.index
            .insert(resource.address.clone(), self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, address: &str) -> Option<&NormalizedResource> {
        self.index.get(address).map(|&i| &self.resources[i])
    }

    pub fn contains(&self, address: &str) -> bool {
        self.index.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Addresses of resources whose action changes infrastructure
    pub fn changed_addresses(&self) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|r| r.action.is_change())
            .map(|r| r.address.as_str())
            .collect()
    }
}

/// Severity of a security exposure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Kind of security exposure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExposureKind {
    IngressCidr,
    EgressCidr,
    S3PublicAcl,
    S3PublicBlockDisabled,
}

impl ExposureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExposureKind::IngressCidr => "ingress_cidr",
            ExposureKind::EgressCidr => "egress_cidr",
            ExposureKind::S3PublicAcl => "s3_public_acl",
            ExposureKind::S3PublicBlockDisabled => "s3_public_block_disabled",
        }
    }
}

/// A world-open or public-data exposure found in the plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityExposure {
    pub resource_address: String,
    pub kind: ExposureKind,
    /// For SG rules: the first sensitive port covered by the rule's range,
    /// or the rule's from_port when no sensitive port is covered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    pub severity: Severity,
}

/// Data-protection attribute weakened by an update
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionAttribute {
    ForceDestroy,
    PreventDestroy,
    DeletionProtection,
}

/// An update that weakens a data-protection attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateDestructiveUpdate {
    pub resource_address: String,
    pub attribute: ProtectionAttribute,
    pub before: serde_json::Value,
    pub after: serde_json::Value,
}

/// Kind of cost alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CostAlertKind {
    HighCostCreate,
    HighCostInstanceCreate,
    InstanceScaleUp,
}

impl CostAlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CostAlertKind::HighCostCreate => "high_cost_create",
            CostAlertKind::HighCostInstanceCreate => "high_cost_instance_create",
            CostAlertKind::InstanceScaleUp => "instance_scale_up",
        }
    }
}

/// A cost-relevant change flagged by the cost checks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostAlert {
    pub resource_address: String,
    pub kind: CostAlertKind,
    pub details: String,
}

/// Risk dimension identifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Data,
    Security,
    Infrastructure,
    Cost,
}

impl Dimension {
    /// Fixed tie-break order for the primary dimension
    pub const ORDER: [Dimension; 4] = [
        Dimension::Data,
        Dimension::Security,
        Dimension::Infrastructure,
        Dimension::Cost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Data => "data",
            Dimension::Security => "security",
            Dimension::Infrastructure => "infrastructure",
            Dimension::Cost => "cost",
        }
    }
}

/// Per-dimension risk scores
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct DimensionScores {
    pub data: f64,
    pub security: f64,
    pub infrastructure: f64,
    pub cost: f64,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Data => self.data,
            Dimension::Security => self.security,
            Dimension::Infrastructure => self.infrastructure,
            Dimension::Cost => self.cost,
        }
    }

    /// The dimension with the largest value; ties resolve in the fixed
    /// data, security, infrastructure, cost order
    pub fn primary(&self) -> Dimension {
        let mut best = Dimension::Data;
        for dimension in Dimension::ORDER {
            if self.get(dimension) > self.get(best) {
                best = dimension;
            }
        }
        best
    }

    pub fn max_value(&self) -> f64 {
        self.get(self.primary())
    }

    /// Number of dimensions at or above the given threshold
    pub fn count_at_or_above(&self, threshold: f64) -> usize {
        Dimension::ORDER
            .iter()
            .filter(|d| self.get(**d) >= threshold)
            .count()
    }

    pub fn all_zero(&self) -> bool {
        self.data == 0.0 && self.security == 0.0 && self.infrastructure == 0.0 && self.cost == 0.0
    }
}

/// Six-tier risk classification, ascending severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskTier {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "HIGH-SEVERE")]
    HighSevere,
    #[serde(rename = "CRITICAL")]
    Critical,
    #[serde(rename = "CRITICAL-CATASTROPHIC")]
    CriticalCatastrophic,
}

impl RiskTier {
    pub fn ordinal(self) -> u8 {
        match self {
            RiskTier::Low => 0,
            RiskTier::Medium => 1,
            RiskTier::High => 2,
            RiskTier::HighSevere => 3,
            RiskTier::Critical => 4,
            RiskTier::CriticalCatastrophic => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::HighSevere => "HIGH-SEVERE",
            RiskTier::Critical => "CRITICAL",
            RiskTier::CriticalCatastrophic => "CRITICAL-CATASTROPHIC",
        }
    }

    /// Gate action for this tier
    pub fn action(self) -> RiskGateAction {
        match self {
            RiskTier::CriticalCatastrophic => RiskGateAction::HardBlock,
            RiskTier::Critical => RiskGateAction::SoftBlock,
            RiskTier::HighSevere | RiskTier::High => RiskGateAction::RequireApproval,
            RiskTier::Medium => RiskGateAction::RequirePeerReview,
            RiskTier::Low => RiskGateAction::AutoApprove,
        }
    }

    /// Approval level required for this tier
    pub fn approval(self) -> ApprovalLevel {
        match self {
            RiskTier::CriticalCatastrophic => ApprovalLevel::VpPlusIncident,
            RiskTier::Critical => ApprovalLevel::VpOrDirector,
            RiskTier::HighSevere => ApprovalLevel::SeniorPlusArchitect,
            RiskTier::High => ApprovalLevel::SeniorOrLead,
            RiskTier::Medium => ApprovalLevel::Any,
            RiskTier::Low => ApprovalLevel::None,
        }
    }

    /// Policy-compatibility projection onto the four-tier taxonomy
    pub fn project(self) -> RiskLevel {
        match self {
            RiskTier::CriticalCatastrophic | RiskTier::Critical => RiskLevel::Critical,
            RiskTier::HighSevere | RiskTier::High => RiskLevel::High,
            RiskTier::Medium => RiskLevel::Medium,
            RiskTier::Low => RiskLevel::Low,
        }
    }
}

/// Four-tier projection used by policy matching
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

/// CI gate action attached to a risk tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskGateAction {
    HardBlock,
    SoftBlock,
    RequireApproval,
    RequirePeerReview,
    AutoApprove,
}

impl RiskGateAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskGateAction::HardBlock => "HARD_BLOCK",
            RiskGateAction::SoftBlock => "SOFT_BLOCK",
            RiskGateAction::RequireApproval => "REQUIRE_APPROVAL",
            RiskGateAction::RequirePeerReview => "REQUIRE_PEER_REVIEW",
            RiskGateAction::AutoApprove => "AUTO_APPROVE",
        }
    }
}

/// Approval level attached to a risk tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApprovalLevel {
    #[serde(rename = "VP+INCIDENT")]
    VpPlusIncident,
    #[serde(rename = "VP-or-DIRECTOR")]
    VpOrDirector,
    #[serde(rename = "SENIOR+ARCHITECT")]
    SeniorPlusArchitect,
    #[serde(rename = "SENIOR-or-LEAD")]
    SeniorOrLead,
    #[serde(rename = "ANY")]
    Any,
    #[serde(rename = "NONE")]
    None,
}

impl ApprovalLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalLevel::VpPlusIncident => "VP+INCIDENT",
            ApprovalLevel::VpOrDirector => "VP-or-DIRECTOR",
            ApprovalLevel::SeniorPlusArchitect => "SENIOR+ARCHITECT",
            ApprovalLevel::SeniorOrLead => "SENIOR-or-LEAD",
            ApprovalLevel::Any => "ANY",
            ApprovalLevel::None => "NONE",
        }
    }
}
