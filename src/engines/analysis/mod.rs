// Analysis stage: the five checks and the risk scorer

pub mod blast_radius;
pub mod cost;
pub mod recommendations;
pub mod scoring;
pub mod security;
pub mod shared_resources;
pub mod state_destructive;

pub use blast_radius::BlastRadius;
pub use scoring::RiskScore;
pub use shared_resources::SharedResource;
