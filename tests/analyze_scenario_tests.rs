// End-to-end scenario coverage over fixture plans

use preapply::engines::RiskAnalyzer;
use preapply::RiskConfig;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn analyze(name: &str) -> preapply::engines::AnalysisReport {
    RiskAnalyzer::new(RiskConfig::default())
        .analyze_path(fixture(name))
        .expect("fixture analyzes cleanly")
}

#[test]
fn clean_bucket_creation_is_low_risk() {
    let report = analyze("s1_create_bucket.json");
    let output = &report.output;

    assert_eq!(output.blast_radius_score, 0.0);
    assert_eq!(output.risk_level.as_str(), "LOW");
    assert_eq!(output.risk_level_detailed.as_str(), "LOW");
    assert_eq!(output.risk_action.as_str(), "AUTO_APPROVE");
    assert_eq!(output.approval_required.as_str(), "NONE");
    assert_eq!(output.affected_count, 1);
    assert_eq!(output.deletion_count, 0);
    assert!(output.recommendations.is_empty());

    let breakdown = &output.risk_attributes.risk_breakdown;
    assert_eq!(breakdown.dimensions.data, 0.0);
    assert_eq!(breakdown.dimensions.security, 0.0);
    assert_eq!(breakdown.dimensions.infrastructure, 0.0);
    assert_eq!(breakdown.dimensions.cost, 0.0);
    assert_eq!(breakdown.blast_contribution, 0.0);
}

#[test]
fn critical_vpc_update_crosses_into_high() {
    let report = analyze("s2_vpc_update.json");
    let output = &report.output;
    let breakdown = &output.risk_attributes.risk_breakdown;

    // 30 * 1.3 (critical) * 1.5 (update)
    assert_eq!(breakdown.dimensions.infrastructure, 58.5);
    assert_eq!(breakdown.dimensions.data, 0.0);
    assert_eq!(breakdown.dimensions.security, 0.0);
    assert_eq!(breakdown.dimensions.cost, 0.0);
    assert_eq!(breakdown.interaction_multiplier, 0.0);
    assert_eq!(breakdown.primary_dimension.as_str(), "infrastructure");

    // 10 * log2(3) at context weight 1.0
    assert_eq!(breakdown.blast_contribution, 15.85);
    assert_eq!(output.affected_count, 2);
    assert_eq!(output.blast_radius_score, 74.35);
    assert_eq!(output.risk_level_detailed.as_str(), "HIGH");
}

#[test]
fn database_deletion_with_open_ssh_is_high() {
    let report = analyze("s3_delete_db_open_sg.json");
    let output = &report.output;
    let breakdown = &output.risk_attributes.risk_breakdown;

    assert_eq!(breakdown.dimensions.data, 50.0);
    assert_eq!(breakdown.dimensions.security, 60.0);
    assert_eq!(breakdown.dimensions.infrastructure, 0.0);
    assert_eq!(breakdown.interaction_multiplier, 0.35);
    assert_eq!(breakdown.primary_dimension.as_str(), "security");

    // only the deletion is a change, so blast covers one resource
    assert_eq!(output.affected_count, 1);
    assert_eq!(breakdown.blast_contribution, 4.0);

    // 60 * 1.35 + 10 * 0.4
    assert_eq!(output.blast_radius_score, 85.0);
    assert_eq!(output.risk_level_detailed.as_str(), "HIGH");
    assert_eq!(output.risk_action.as_str(), "REQUIRE_APPROVAL");
    assert_eq!(output.approval_required.as_str(), "SENIOR-or-LEAD");

    assert_eq!(
        output.risk_attributes.sensitive_deletions,
        vec!["aws_db_instance.production"]
    );
    assert_eq!(output.risk_attributes.security_exposures.len(), 1);
    assert_eq!(
        output.recommendations,
        vec![
            "verify backup before proceeding",
            "restrict ingress to known CIDR ranges"
        ]
    );
}

#[test]
fn compound_destructive_plan_is_critical() {
    let report = analyze("s4_compound_critical.json");
    let output = &report.output;
    let breakdown = &output.risk_attributes.risk_breakdown;

    // two deletions decayed plus the weakened bucket: 50 + 42.5 + 21.675,
    // landing on a rounding boundary, so allow either neighbor
    assert!((breakdown.dimensions.data - 114.175).abs() < 0.01);
    assert_eq!(breakdown.dimensions.security, 60.0);
    assert_eq!(breakdown.dimensions.infrastructure, 58.5);

    // data∧security pairwise plus the perfect storm
    assert_eq!(breakdown.interaction_multiplier, 0.75);
    assert_eq!(breakdown.primary_dimension.as_str(), "data");

    assert_eq!(output.affected_count, 8);
    assert_eq!(output.deletion_count, 2);
    assert_eq!(output.risk_level.as_str(), "CRITICAL");
    assert!(output.blast_radius_score >= 150.0);

    assert!(output
        .recommendations
        .contains(&"verify backup before proceeding".to_string()));
    assert!(output
        .recommendations
        .contains(&"restrict ingress to known CIDR ranges".to_string()));
}

#[test]
fn empty_change_set_yields_all_zero_dimensions() {
    let bytes = br#"{
        "format_version": "1.2",
        "resource_changes": [
            {
                "address": "aws_s3_bucket.steady",
                "type": "aws_s3_bucket",
                "change": { "actions": ["no-op"], "before": {}, "after": {} }
            }
        ]
    }"#;
    let report = RiskAnalyzer::new(RiskConfig::default())
        .analyze_bytes(bytes)
        .unwrap();

    let breakdown = &report.output.risk_attributes.risk_breakdown;
    assert_eq!(breakdown.dimensions.data, 0.0);
    assert_eq!(breakdown.dimensions.security, 0.0);
    assert_eq!(breakdown.dimensions.infrastructure, 0.0);
    assert_eq!(breakdown.dimensions.cost, 0.0);
    assert_eq!(breakdown.blast_contribution, 0.0);
    assert_eq!(report.output.affected_count, 0);
    assert_eq!(report.output.risk_level_detailed.as_str(), "LOW");
}

#[test]
fn thresholds_are_configurable() {
    let mut config = RiskConfig::default();
    config.risk_scoring.thresholds.high = 80.0;
    config.risk_scoring.thresholds.medium = 30.0;

    let report = RiskAnalyzer::new(config)
        .analyze_path(fixture("s2_vpc_update.json"))
        .unwrap();

    // 74.35 no longer reaches the raised HIGH bar
    assert_eq!(report.output.risk_level_detailed.as_str(), "MEDIUM");
}
