//! Core error types

use thiserror::Error;

/// Errors raised by core primitives
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f32),

    #[error("Invalid substep limit: {0}")]
    InvalidSubstepLimit(u32),

    #[error("Unknown task: {0}")]
    UnknownTask(u64),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;
