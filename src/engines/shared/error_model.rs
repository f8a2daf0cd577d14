// Error model with stable error tags and categorization

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error categories for PreApply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Plan file missing, unreadable, or not a JSON mapping
    PlanLoad,
    /// Required plan keys missing or wrongly shaped
    PlanStructure,
    /// Configuration file missing or malformed
    ConfigLoad,
    /// Policy file missing or malformed
    PolicyLoad,
    /// An internal invariant of the analysis failed
    InternalInvariant,
}

impl ErrorCategory {
    /// Stable string tag surfaced in CLI output and logs
    pub fn tag(self) -> &'static str {
        match self {
            ErrorCategory::PlanLoad => "PlanLoadError",
            ErrorCategory::PlanStructure => "PlanStructureError",
            ErrorCategory::ConfigLoad => "ConfigLoadError",
            ErrorCategory::PolicyLoad => "PolicyLoadError",
            ErrorCategory::InternalInvariant => "InternalInvariantError",
        }
    }
}

/// Stable error with tag, category, and remediation hint
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("[{}] {}{}", .category.tag(), .message, fmt_hint(.hint))]
pub struct PreApplyError {
    /// Error category (determines the stable tag)
    pub category: ErrorCategory,
    /// Human-readable message
    pub message: String,
    /// Remediation hint
    pub hint: Option<String>,
}

impl PreApplyError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Stable string tag for this error
    pub fn tag(&self) -> &'static str {
        self.category.tag()
    }

    /// Plan could not be read or decoded
    pub fn plan_load(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::PlanLoad, message).with_hint(
            "Generate the plan with 'terraform show -json plan.out' and pass the resulting file",
        )
    }

    /// Plan decoded but required keys are missing or wrongly shaped
    pub fn plan_structure(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::PlanStructure, message)
            .with_hint("The plan must carry 'format_version' and a 'resource_changes' array")
    }

    /// Configuration file failed to load or parse
    pub fn config_load(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::ConfigLoad, message)
            .with_hint("Verify the configuration file path and YAML syntax")
    }

    /// Policy file failed to load or parse
    pub fn policy_load(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::PolicyLoad, message)
            .with_hint("Verify the policy file path and the rules schema")
    }

    /// Internal invariant violated; carries the invariant name
    pub fn invariant(name: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::InternalInvariant,
            format!("{}: {}", name, message.into()),
        )
    }
}

fn fmt_hint(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!("\n  Hint: {}", hint),
        None => String::new(),
    }
}

/// Type alias for Results
pub type Result<T> = std::result::Result<T, PreApplyError>;
