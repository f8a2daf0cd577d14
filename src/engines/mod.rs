// PreApply analysis engines

pub mod analysis;
pub mod analyzer;
pub mod graph;
pub mod ingest;
pub mod output;
pub mod policy;
pub mod shared;

pub use analyzer::{AnalysisReport, RiskAnalyzer};
