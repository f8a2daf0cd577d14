// Policy evaluation against a scored analysis

use super::policy_types::{
    MatchConditions, PolicyAction, PolicyDocument, PolicyEvaluationResult, RuleHit,
};
use crate::engines::output::CoreOutput;

/// Evaluate every rule against the output. All rules run so the counts are
/// complete; the exit-code translation only cares whether any `fail`
/// matched.
pub fn evaluate(output: &CoreOutput, policy: &PolicyDocument) -> PolicyEvaluationResult {
    let mut failure_count = 0;
    let mut warning_count = 0;
    let mut rule_hits = Vec::new();

    for rule in &policy.rules {
        if !matches(&rule.match_conditions, output) {
            continue;
        }
        match rule.action {
            PolicyAction::Fail => failure_count += 1,
            PolicyAction::Warn => warning_count += 1,
        }
        rule_hits.push(RuleHit {
            rule_id: rule.id.clone(),
            description: rule.description.clone(),
            action: rule.action,
        });
    }

    PolicyEvaluationResult {
        passed: failure_count == 0,
        failure_count,
        warning_count,
        rule_hits,
    }
}

/// All present conditions must hold
fn matches(conditions: &MatchConditions, output: &CoreOutput) -> bool {
    if let Some(id) = &conditions.explanation_id {
        if id != &output.explanation_id {
            return false;
        }
    }

    if let Some(levels) = &conditions.risk_level {
        if !levels.contains(&output.risk_level) {
            return false;
        }
    }

    if let Some(actions) = &conditions.action_type {
        let observed = &output.risk_attributes.action_types;
        if !actions
            .iter()
            .any(|action| observed.iter().any(|o| o == action.as_str()))
        {
            return false;
        }
    }

    if let Some(expected) = conditions.has_sensitive_deletions {
        let actual = !output.risk_attributes.sensitive_deletions.is_empty();
        if actual != expected {
            return false;
        }
    }

    if let Some(expected) = conditions.has_security_exposures {
        let actual = !output.risk_attributes.security_exposures.is_empty();
        if actual != expected {
            return false;
        }
    }

    true
}
