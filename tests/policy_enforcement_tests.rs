// Policy evaluation against analyzed fixtures

use preapply::engines::policy::{evaluate, load_policy, EnforcementMode};
use preapply::engines::RiskAnalyzer;
use preapply::RiskConfig;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn analyzed_output(name: &str) -> preapply::CoreOutput {
    RiskAnalyzer::new(RiskConfig::default())
        .analyze_path(fixture(name))
        .unwrap()
        .output
}

#[test]
fn high_risk_exposure_fails_in_auto_mode() {
    let output = analyzed_output("s3_delete_db_open_sg.json");
    let policy = load_policy(fixture("policy_block_high.yaml")).unwrap();

    let result = evaluate(&output, &policy);
    assert!(!result.passed);
    assert_eq!(result.failure_count, 1);
    assert_eq!(result.warning_count, 0);
    assert_eq!(result.rule_hits.len(), 1);
    assert_eq!(result.rule_hits[0].rule_id, "block-exposed-high-risk");
    assert_eq!(result.exit_code(EnforcementMode::Auto), 2);
}

#[test]
fn same_failure_requires_approval_in_manual_mode() {
    let output = analyzed_output("s3_delete_db_open_sg.json");
    let policy = load_policy(fixture("policy_block_high.yaml")).unwrap();

    let result = evaluate(&output, &policy);
    assert_eq!(result.failure_count, 1);
    assert_eq!(result.exit_code(EnforcementMode::Manual), 3);
}

#[test]
fn warn_action_passes_with_a_warning() {
    let output = analyzed_output("s3_delete_db_open_sg.json");
    let policy = load_policy(fixture("policy_warn_high.yaml")).unwrap();

    let result = evaluate(&output, &policy);
    assert!(result.passed);
    assert_eq!(result.failure_count, 0);
    assert_eq!(result.warning_count, 1);
    assert_eq!(result.exit_code(EnforcementMode::Auto), 0);
    assert_eq!(result.exit_code(EnforcementMode::Manual), 0);
}

#[test]
fn low_risk_plan_passes_the_blocking_policy() {
    let output = analyzed_output("s1_create_bucket.json");
    let policy = load_policy(fixture("policy_block_high.yaml")).unwrap();

    let result = evaluate(&output, &policy);
    assert!(result.passed);
    assert!(result.rule_hits.is_empty());
    assert_eq!(result.exit_code(EnforcementMode::Auto), 0);
}

#[test]
fn critical_plan_also_trips_the_blocking_policy() {
    let output = analyzed_output("s4_compound_critical.json");
    let policy = load_policy(fixture("policy_block_high.yaml")).unwrap();

    let result = evaluate(&output, &policy);
    assert!(!result.passed);
    assert_eq!(result.exit_code(EnforcementMode::Auto), 2);
}
