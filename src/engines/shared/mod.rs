pub mod error_model;
pub mod models;
