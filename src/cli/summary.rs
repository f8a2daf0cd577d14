// summary command: one-screen plan overview

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::utils::tier_label;
use crate::config::RiskConfig;
use crate::engines::shared::models::ResourceAction;
use crate::engines::RiskAnalyzer;

/// Summarize a plan: change counts, score, and tier
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Path to the plan JSON
    pub plan: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PlanSummary {
    creates: usize,
    updates: usize,
    deletes: usize,
    reads: usize,
    no_ops: usize,
    affected_count: usize,
    security_exposures: usize,
    cost_alerts: usize,
    score: f64,
    risk_level: String,
    risk_level_detailed: String,
}

impl SummaryCommand {
    pub fn run(&self, config: RiskConfig) -> anyhow::Result<i32> {
        let analyzer = RiskAnalyzer::new(config);
        let report = analyzer.analyze_path(&self.plan)?;

        let count = |action: ResourceAction| {
            report
                .plan
                .resources
                .iter()
                .filter(|r| r.action == action)
                .count()
        };

        let summary = PlanSummary {
            creates: count(ResourceAction::Create),
            updates: count(ResourceAction::Update),
            deletes: count(ResourceAction::Delete),
            reads: count(ResourceAction::Read),
            no_ops: count(ResourceAction::NoOp),
            affected_count: report.output.affected_count,
            security_exposures: report.output.risk_attributes.security_exposures.len(),
            cost_alerts: report.output.risk_attributes.cost_alerts.len(),
            score: report.output.blast_radius_score,
            risk_level: report.output.risk_level.as_str().to_string(),
            risk_level_detailed: report.output.risk_level_detailed.as_str().to_string(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "{} +{} ~{} -{} (reads {}, no-ops {})",
                "changes:".bold(),
                summary.creates,
                summary.updates,
                summary.deletes,
                summary.reads,
                summary.no_ops
            );
            println!(
                "{} {} affected, {} exposures, {} cost alerts",
                "impact: ".bold(),
                summary.affected_count,
                summary.security_exposures,
                summary.cost_alerts
            );
            println!(
                "{} {} (score {:.2})",
                "risk:   ".bold(),
                tier_label(report.output.risk_level_detailed),
                summary.score
            );
        }

        Ok(0)
    }
}
