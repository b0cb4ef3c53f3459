//! Error types for the physics layer

use thiserror::Error;

/// Physics errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),

    /// Collider shape with non-positive extent
    #[error("Invalid collider shape for {0}")]
    InvalidShape(heist_core::EntityId),

    /// Time stepping rejected by the core stepper
    #[error(transparent)]
    Core(#[from] heist_core::CoreError),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
