// explain command: per-resource analysis detail

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::RiskConfig;
use crate::engines::shared::error_model::PreApplyError;
use crate::engines::shared::models::{CostAlert, SecurityExposure};
use crate::engines::{AnalysisReport, RiskAnalyzer};

/// Explain which resources drive the assessment
#[derive(Debug, Args)]
pub struct ExplainCommand {
    /// Path to the plan JSON
    pub input: PathBuf,

    /// Limit the explanation to one resource (address or local id)
    pub resource_id: Option<String>,

    /// Print the explanation as JSON
    #[arg(long)]
    pub json: bool,

    /// List resource addresses and exit
    #[arg(long)]
    pub list_resources: bool,
}

/// Per-resource view assembled from the analysis artifacts
#[derive(Debug, Serialize)]
struct ResourceExplanation {
    address: String,
    #[serde(rename = "type")]
    resource_type: String,
    module: String,
    action: String,
    depends_on: Vec<String>,
    dependents: Vec<String>,
    security_exposures: Vec<SecurityExposure>,
    cost_alerts: Vec<CostAlert>,
    sensitive_deletion: bool,
}

impl ExplainCommand {
    pub fn run(&self, config: RiskConfig) -> anyhow::Result<i32> {
        let analyzer = RiskAnalyzer::new(config);
        let report = analyzer.analyze_path(&self.input)?;

        if self.list_resources {
            let mut addresses: Vec<&str> = report
                .plan
                .resources
                .iter()
                .map(|r| r.address.as_str())
                .collect();
            addresses.sort();
            for address in addresses {
                println!("{}", address);
            }
            return Ok(0);
        }

        let mut explanations = explain_resources(&report);
        if let Some(wanted) = &self.resource_id {
            explanations.retain(|e| {
                &e.address == wanted || e.address.ends_with(&format!(".{}", wanted))
            });
            if explanations.is_empty() {
                return Err(PreApplyError::plan_structure(format!(
                    "resource '{}' is not present in the plan",
                    wanted
                ))
                .into());
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&explanations)?);
        } else {
            for explanation in &explanations {
                render(explanation);
            }
        }

        Ok(0)
    }
}

fn explain_resources(report: &AnalysisReport) -> Vec<ResourceExplanation> {
    let plan = &report.plan;
    let attributes = &report.output.risk_attributes;

    let mut explanations: Vec<ResourceExplanation> = plan
        .resources
        .iter()
        .map(|resource| {
            let dependents: Vec<String> = plan
                .resources
                .iter()
                .filter(|other| other.depends_on.contains(&resource.address))
                .map(|other| other.address.clone())
                .collect();

            ResourceExplanation {
                address: resource.address.clone(),
                resource_type: resource.resource_type.clone(),
                module: resource.module.clone(),
                action: resource.action.as_str().to_string(),
                depends_on: resource.depends_on.iter().cloned().collect(),
                dependents,
                security_exposures: attributes
                    .security_exposures
                    .iter()
                    .filter(|e| e.resource_address == resource.address)
                    .cloned()
                    .collect(),
                cost_alerts: attributes
                    .cost_alerts
                    .iter()
                    .filter(|a| a.resource_address == resource.address)
                    .cloned()
                    .collect(),
                sensitive_deletion: attributes
                    .sensitive_deletions
                    .contains(&resource.address),
            }
        })
        .collect();

    explanations.sort_by(|a, b| a.address.cmp(&b.address));
    explanations
}

fn render(explanation: &ResourceExplanation) {
    println!(
        "{} {} ({})",
        explanation.action.bold(),
        explanation.address,
        explanation.resource_type
    );
    if !explanation.module.is_empty() {
        println!("  module:     {}", explanation.module);
    }
    if !explanation.depends_on.is_empty() {
        println!("  depends on: {}", explanation.depends_on.join(", "));
    }
    if !explanation.dependents.is_empty() {
        println!("  dependents: {}", explanation.dependents.join(", "));
    }
    for exposure in &explanation.security_exposures {
        println!("  {} {}", "exposure:".red(), exposure.kind.as_str());
    }
    for alert in &explanation.cost_alerts {
        println!("  {} {}", "cost:".yellow(), alert.details);
    }
    if explanation.sensitive_deletion {
        println!("  {}", "sensitive deletion".red().bold());
    }
}
