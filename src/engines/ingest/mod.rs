// Ingest stage: plan loading, validation, and normalization

pub mod normalizer;
pub mod plan_loader;

pub use normalizer::Normalizer;
pub use plan_loader::{load_plan, resource_changes, validate_plan_bytes};
