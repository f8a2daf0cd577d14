// PreApply library root

pub mod cli;
pub mod config;
pub mod engines;
pub mod errors;

pub use config::{load_config, load_config_from_path, RiskConfig};
pub use engines::output::CoreOutput;
pub use engines::shared::models::*;
pub use engines::{AnalysisReport, RiskAnalyzer};

/// PreApply version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
