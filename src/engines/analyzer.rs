// Pipeline orchestrator: ingest → normalize → graph → analyze → contract

use std::path::Path;

use crate::config::RiskConfig;
use crate::engines::analysis::{
    blast_radius, cost, recommendations, scoring, security, shared_resources, state_destructive,
};
use crate::engines::graph::build_graph;
use crate::engines::ingest::{load_plan, validate_plan_bytes, Normalizer};
use crate::engines::output::contract::{self, CoreOutput};
use crate::engines::shared::error_model::{PreApplyError, Result};
use crate::engines::shared::models::NormalizedPlan;

/// Full analysis artifacts for one invocation. The normalized plan rides
/// along for commands that render per-resource detail.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub output: CoreOutput,
    pub plan: NormalizedPlan,
}

/// Runs the five stages in fixed order. Holds the immutable configuration;
/// every stage is a pure function of its inputs, so identical plan and
/// configuration bytes produce identical output bytes.
pub struct RiskAnalyzer {
    config: RiskConfig,
}

impl RiskAnalyzer {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<AnalysisReport> {
        let (bytes, raw) = load_plan(path)?;
        self.analyze_raw(&bytes, &raw)
    }

    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisReport> {
        let raw = validate_plan_bytes(bytes)?;
        self.analyze_raw(bytes, &raw)
    }

    fn analyze_raw(&self, bytes: &[u8], raw: &serde_json::Value) -> Result<AnalysisReport> {
        let plan = Normalizer::new().normalize(raw)?;
        let graph = build_graph(&plan);

        let blast = blast_radius::compute(&graph, &plan);
        let shared = shared_resources::detect(&graph, &plan, &self.config);
        let exposures = security::scan(raw, &self.config.risk_scoring.security);
        let destructive = state_destructive::detect(&plan, raw);
        let alerts = cost::detect(&plan, &self.config.cost_alerts);

        check_address_resolution(&plan, &exposures, &destructive, &alerts)?;

        let score = scoring::compute(
            &graph,
            &plan,
            &exposures,
            &destructive,
            &alerts,
            &blast,
            &self.config,
        );
        let recommendations = recommendations::compute(&plan, &exposures, &shared, &blast);

        let output = contract::build(
            bytes,
            &plan,
            &exposures,
            &alerts,
            &shared,
            &blast,
            &score,
            recommendations,
            &self.config,
        );

        Ok(AnalysisReport { output, plan })
    }
}

/// Every address carried by an alert must resolve to a plan resource
fn check_address_resolution(
    plan: &NormalizedPlan,
    exposures: &[crate::engines::shared::models::SecurityExposure],
    destructive: &[crate::engines::shared::models::StateDestructiveUpdate],
    alerts: &[crate::engines::shared::models::CostAlert],
) -> Result<()> {
    let check = |address: &str| -> Result<()> {
        if plan.contains(address) {
            Ok(())
        } else {
            Err(PreApplyError::invariant(
                "alert-address-resolution",
                format!("alert references unknown resource '{}'", address),
            ))
        }
    };

    for exposure in exposures {
        check(&exposure.resource_address)?;
    }
    for update in destructive {
        check(&update.resource_address)?;
    }
    for alert in alerts {
        check(&alert.resource_address)?;
    }
    Ok(())
}
