// analyze command: full risk assessment for one plan

use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::utils::{tier_label, write_output_file};
use crate::config::RiskConfig;
use crate::engines::output::CoreOutput;
use crate::engines::RiskAnalyzer;

/// Analyze a Terraform plan JSON file
#[derive(Debug, Args)]
pub struct AnalyzeCommand {
    /// Path to the plan JSON (terraform show -json plan.out)
    pub plan: PathBuf,

    /// Print the contract JSON instead of the report
    #[arg(long)]
    pub json: bool,

    /// Also write the contract JSON to a file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print only the one-line verdict
    #[arg(long)]
    pub quiet: bool,
}

impl AnalyzeCommand {
    pub fn run(&self, config: RiskConfig) -> anyhow::Result<i32> {
        let analyzer = RiskAnalyzer::new(config);
        let report = analyzer.analyze_path(&self.plan)?;
        let json = report.output.to_json()?;

        if let Some(path) = &self.output {
            write_output_file(path, &json)?;
        }

        if self.json {
            println!("{}", json);
        } else if self.quiet {
            println!(
                "{} {} (score {:.2}, {})",
                "risk:".bold(),
                tier_label(report.output.risk_level_detailed),
                report.output.blast_radius_score,
                report.output.risk_action.as_str()
            );
        } else {
            render_report(&report.output);
        }

        Ok(0)
    }
}

fn render_report(output: &CoreOutput) {
    println!("{}", "PreApply risk assessment".bold());
    println!("  report id:  {}", output.explanation_id);
    println!(
        "  risk:       {} ({})",
        tier_label(output.risk_level_detailed),
        output.risk_level.as_str()
    );
    println!("  score:      {:.2}", output.blast_radius_score);
    println!(
        "  gate:       {} / approval {}",
        output.risk_action.as_str(),
        output.approval_required.as_str()
    );
    println!(
        "  blast:      {} affected, {} deletions",
        output.affected_count, output.deletion_count
    );
    if !output.affected_components.is_empty() {
        println!("  components: {}", output.affected_components.join(", "));
    }

    let breakdown = &output.risk_attributes.risk_breakdown;
    println!(
        "  dimensions: data {:.1} | security {:.1} | infrastructure {:.1} | cost {:.1}",
        breakdown.dimensions.data,
        breakdown.dimensions.security,
        breakdown.dimensions.infrastructure,
        breakdown.dimensions.cost
    );
    println!(
        "  modifiers:  interaction +{:.0}% | blast +{:.2} ({})",
        breakdown.interaction_multiplier * 100.0,
        breakdown.blast_contribution,
        breakdown.primary_dimension.as_str()
    );

    let exposures = &output.risk_attributes.security_exposures;
    if !exposures.is_empty() {
        println!("\n{}", "Security exposures".bold());
        for exposure in exposures {
            let port = exposure
                .port
                .map(|p| format!(" port {}", p))
                .unwrap_or_default();
            let cidr = exposure
                .cidr
                .as_deref()
                .map(|c| format!(" {}", c))
                .unwrap_or_default();
            println!(
                "  {} {} {}{}{}",
                severity_marker(exposure.severity),
                exposure.resource_address,
                exposure.kind.as_str(),
                port,
                cidr
            );
        }
    }

    let alerts = &output.risk_attributes.cost_alerts;
    if !alerts.is_empty() {
        println!("\n{}", "Cost alerts".bold());
        for alert in alerts {
            println!(
                "  {} {} ({})",
                alert.resource_address,
                alert.kind.as_str(),
                alert.details
            );
        }
    }

    if !output.recommendations.is_empty() {
        println!("\n{}", "Recommendations".bold());
        for recommendation in &output.recommendations {
            println!("  - {}", recommendation);
        }
    }
}

fn severity_marker(severity: crate::engines::shared::models::Severity) -> colored::ColoredString {
    use crate::engines::shared::models::Severity;
    match severity {
        Severity::High => "HIGH".red(),
        Severity::Medium => "MED ".yellow(),
        Severity::Low => "LOW ".green(),
    }
}
