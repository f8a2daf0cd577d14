// policy command: evaluate a plan against a policy document

use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use super::utils::tier_label;
use crate::config::{load_config_from_path, RiskConfig};
use crate::engines::policy::{evaluate, load_policy, EnforcementMode, PolicyAction};
use crate::engines::RiskAnalyzer;

#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// Analyze a plan and gate it on a policy document
    Check(PolicyCheckCommand),
}

#[derive(Debug, Args)]
pub struct PolicyCheckCommand {
    /// Path to the plan JSON
    pub plan: PathBuf,

    /// Path to the policy YAML
    #[arg(long)]
    pub policy_file: PathBuf,

    /// Environment-specific configuration overriding the global one
    #[arg(long)]
    pub environment: Option<PathBuf>,

    /// How failed rules translate to exit codes
    #[arg(long, value_enum, default_value = "auto")]
    pub enforcement_mode: EnforcementMode,
}

impl PolicyCheckCommand {
    pub fn run(&self, config: RiskConfig) -> anyhow::Result<i32> {
        let config = match &self.environment {
            Some(path) => load_config_from_path(path)?,
            None => config,
        };

        let analyzer = RiskAnalyzer::new(config);
        let report = analyzer.analyze_path(&self.plan)?;
        let policy = load_policy(&self.policy_file)?;
        let result = evaluate(&report.output, &policy);

        println!(
            "{} {} (score {:.2})",
            "risk:".bold(),
            tier_label(report.output.risk_level_detailed),
            report.output.blast_radius_score
        );

        for hit in &result.rule_hits {
            let marker = match hit.action {
                PolicyAction::Fail => "FAIL".red().bold(),
                PolicyAction::Warn => "WARN".yellow(),
            };
            if hit.description.is_empty() {
                println!("  {} {}", marker, hit.rule_id);
            } else {
                println!("  {} {} ({})", marker, hit.rule_id, hit.description);
            }
        }

        if result.passed {
            println!(
                "{} {} warning(s)",
                "policy passed,".green(),
                result.warning_count
            );
        } else {
            println!(
                "{} {} failure(s), {} warning(s)",
                "policy blocked:".red().bold(),
                result.failure_count,
                result.warning_count
            );
        }

        Ok(result.exit_code(self.enforcement_mode))
    }
}
