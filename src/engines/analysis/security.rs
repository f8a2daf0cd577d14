// Security checks: world-open security groups and public S3 buckets

use serde_json::Value;

use crate::config::SecurityWeights;
use crate::engines::ingest::resource_changes;
use crate::engines::shared::models::{ExposureKind, SecurityExposure, Severity};

const OPEN_IPV4: &str = "0.0.0.0/0";
const OPEN_IPV6: &str = "::/0";

/// Scan the raw plan for security exposures. The scan reads `after` values
/// regardless of action, so a no-op resource that is already world-open
/// still surfaces.
pub fn scan(plan: &Value, security: &SecurityWeights) -> Vec<SecurityExposure> {
    let mut exposures = Vec::new();

    for entry in resource_changes(plan) {
        let Some(address) = entry.get("address").and_then(Value::as_str) else {
            continue;
        };
        let Some(resource_type) = entry.get("type").and_then(Value::as_str) else {
            continue;
        };
        let Some(after) = entry
            .get("change")
            .and_then(|c| c.get("after"))
            .filter(|v| v.is_object())
        else {
            continue;
        };

        match resource_type {
            "aws_security_group" => {
                for (field, kind) in [
                    ("ingress", ExposureKind::IngressCidr),
                    ("egress", ExposureKind::EgressCidr),
                ] {
                    if let Some(rules) = after.get(field).and_then(Value::as_array) {
                        for rule in rules {
                            if let Some(exposure) =
                                check_sg_rule(address, kind, rule, &security.sensitive_ports)
                            {
                                exposures.push(exposure);
                            }
                        }
                    }
                }
            }
            "aws_security_group_rule" => {
                let kind = match after.get("type").and_then(Value::as_str) {
                    Some("egress") => ExposureKind::EgressCidr,
                    _ => ExposureKind::IngressCidr,
                };
                if let Some(exposure) =
                    check_sg_rule(address, kind, after, &security.sensitive_ports)
                {
                    exposures.push(exposure);
                }
            }
            "aws_s3_bucket_public_access_block" => {
                if let Some(exposure) = check_public_access_block(address, after) {
                    exposures.push(exposure);
                }
            }
            "aws_s3_bucket" | "aws_s3_bucket_acl" => {
                if let Some(exposure) = check_bucket_acl(address, after) {
                    exposures.push(exposure);
                }
            }
            _ => {}
        }
    }

    tracing::debug!(count = exposures.len(), "security scan complete");
    exposures
}

/// One exposure per (resource, rule, port-range) when the rule is open to
/// the world. Severity is HIGH when the port range covers a sensitive port.
fn check_sg_rule(
    address: &str,
    kind: ExposureKind,
    rule: &Value,
    sensitive_ports: &[u16],
) -> Option<SecurityExposure> {
    let cidr = open_cidr(rule)?;

    let from_port = rule.get("from_port").and_then(Value::as_u64).map(|p| p as u16);
    let to_port = rule.get("to_port").and_then(Value::as_u64).map(|p| p as u16);

    let covered_sensitive = match (from_port, to_port) {
        (Some(from), Some(to)) => sensitive_ports
            .iter()
            .copied()
            .find(|p| from <= *p && *p <= to),
        _ => None,
    };

    let severity = if covered_sensitive.is_some() {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(SecurityExposure {
        resource_address: address.to_string(),
        kind,
        port: covered_sensitive.or(from_port),
        cidr: Some(cidr),
        severity,
    })
}

/// World-open CIDR on a rule, preferring the IPv4 form when both are present
fn open_cidr(rule: &Value) -> Option<String> {
    let contains = |field: &str, open: &str| {
        rule.get(field)
            .and_then(Value::as_array)
            .is_some_and(|blocks| blocks.iter().any(|b| b.as_str() == Some(open)))
    };

    if contains("cidr_blocks", OPEN_IPV4) {
        Some(OPEN_IPV4.to_string())
    } else if contains("ipv6_cidr_blocks", OPEN_IPV6) {
        Some(OPEN_IPV6.to_string())
    } else {
        None
    }
}

/// Any disabled flag on a public-access block is one HIGH exposure
fn check_public_access_block(address: &str, after: &Value) -> Option<SecurityExposure> {
    const FLAGS: [&str; 4] = [
        "block_public_acls",
        "block_public_policy",
        "ignore_public_acls",
        "restrict_public_buckets",
    ];

    let any_disabled = FLAGS
        .iter()
        .any(|flag| after.get(*flag).and_then(Value::as_bool) == Some(false));

    any_disabled.then(|| SecurityExposure {
        resource_address: address.to_string(),
        kind: ExposureKind::S3PublicBlockDisabled,
        port: None,
        cidr: None,
        severity: Severity::High,
    })
}

fn check_bucket_acl(address: &str, after: &Value) -> Option<SecurityExposure> {
    let severity = match after.get("acl").and_then(Value::as_str) {
        Some("public-read-write") => Severity::High,
        Some("public-read") => Severity::Medium,
        _ => return None,
    };

    Some(SecurityExposure {
        resource_address: address.to_string(),
        kind: ExposureKind::S3PublicAcl,
        port: None,
        cidr: None,
        severity,
    })
}
