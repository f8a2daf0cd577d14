// Re-export of the shared error model

pub use crate::engines::shared::error_model::{ErrorCategory, PreApplyError, Result};
