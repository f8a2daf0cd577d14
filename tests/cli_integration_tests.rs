// CLI behavior: exit codes, flags, and output plumbing

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn analyze_low_risk_plan_exits_zero() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("analyze")
        .arg(fixture("s1_create_bucket.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("LOW"));
}

#[test]
fn analyze_json_emits_the_contract() {
    let output = Command::cargo_bin("preapply")
        .unwrap()
        .arg("analyze")
        .arg(fixture("s3_delete_db_open_sg.json"))
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["risk_level"], "HIGH");
    assert_eq!(value["blast_radius_score"], 85.0);
    assert_eq!(value["risk_attributes"]["action_types"][0], "DELETE");
}

#[test]
fn analyze_quiet_prints_one_line() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("analyze")
        .arg(fixture("s1_create_bucket.json"))
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("AUTO_APPROVE"));
}

#[test]
fn analyze_output_writes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");

    Command::cargo_bin("preapply")
        .unwrap()
        .arg("analyze")
        .arg(fixture("s1_create_bucket.json"))
        .arg("--output")
        .arg(&out)
        .arg("--quiet")
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["risk_level"], "LOW");
}

#[test]
fn missing_plan_file_exits_one() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("analyze")
        .arg("no-such-plan.json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PlanLoadError"));
}

#[test]
fn malformed_plan_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{not json").unwrap();

    Command::cargo_bin("preapply")
        .unwrap()
        .arg("analyze")
        .arg(&bad)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PlanLoadError"));
}

#[test]
fn plan_without_resource_changes_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let thin = dir.path().join("thin.json");
    std::fs::write(&thin, r#"{"format_version": "1.2"}"#).unwrap();

    Command::cargo_bin("preapply")
        .unwrap()
        .arg("analyze")
        .arg(&thin)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PlanStructureError"));
}

#[test]
fn unknown_flag_exits_one() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("analyze")
        .arg(fixture("s1_create_bucket.json"))
        .arg("--definitely-not-a-flag")
        .assert()
        .code(1);
}

#[test]
fn help_exits_zero() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn summary_renders_change_counts() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("summary")
        .arg(fixture("s4_compound_critical.json"))
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deletes\": 2"));
}

#[test]
fn explain_lists_resources() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("explain")
        .arg(fixture("s2_vpc_update.json"))
        .arg("--list-resources")
        .assert()
        .success()
        .stdout(predicate::str::contains("aws_vpc.main"))
        .stdout(predicate::str::contains("aws_subnet.a"));
}

#[test]
fn explain_unknown_resource_exits_one() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("explain")
        .arg(fixture("s2_vpc_update.json"))
        .arg("aws_vpc.ghost")
        .assert()
        .code(1);
}

#[test]
fn policy_check_auto_mode_blocks_with_exit_two() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("policy")
        .arg("check")
        .arg(fixture("s3_delete_db_open_sg.json"))
        .arg("--policy-file")
        .arg(fixture("policy_block_high.yaml"))
        .arg("--enforcement-mode")
        .arg("auto")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("policy blocked"));
}

#[test]
fn policy_check_manual_mode_exits_three() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("policy")
        .arg("check")
        .arg(fixture("s3_delete_db_open_sg.json"))
        .arg("--policy-file")
        .arg(fixture("policy_block_high.yaml"))
        .arg("--enforcement-mode")
        .arg("manual")
        .assert()
        .code(3);
}

#[test]
fn policy_check_warn_rules_exit_zero() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("policy")
        .arg("check")
        .arg(fixture("s3_delete_db_open_sg.json"))
        .arg("--policy-file")
        .arg(fixture("policy_warn_high.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 warning"));
}

#[test]
fn policy_check_missing_policy_file_exits_one() {
    Command::cargo_bin("preapply")
        .unwrap()
        .arg("policy")
        .arg("check")
        .arg(fixture("s1_create_bucket.json"))
        .arg("--policy-file")
        .arg("no-such-policy.yaml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PolicyLoadError"));
}

#[test]
fn config_env_var_pointing_nowhere_exits_one() {
    Command::cargo_bin("preapply")
        .unwrap()
        .env("PREAPPLY_CONFIG", "no-such-config.yaml")
        .arg("analyze")
        .arg(fixture("s1_create_bucket.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ConfigLoadError"));
}

#[test]
fn config_flag_overrides_env_var() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("preapply.yaml");
    std::fs::write(&good, "risk_scoring:\n  data_loss:\n    base_weight: 50\n").unwrap();

    Command::cargo_bin("preapply")
        .unwrap()
        .env("PREAPPLY_CONFIG", "no-such-config.yaml")
        .arg("analyze")
        .arg(fixture("s1_create_bucket.json"))
        .arg("--config")
        .arg(&good)
        .arg("--quiet")
        .assert()
        .success();
}

#[test]
fn identical_invocations_emit_identical_json() {
    let run = || {
        Command::cargo_bin("preapply")
            .unwrap()
            .arg("analyze")
            .arg(fixture("s4_compound_critical.json"))
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    assert_eq!(run(), run());
}
