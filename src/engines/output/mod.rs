// Contract stage: the versioned output record

pub mod contract;

pub use contract::{CoreOutput, OUTPUT_VERSION};
