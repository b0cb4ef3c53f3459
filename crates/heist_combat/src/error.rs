//! Combat configuration errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombatError {
    #[error("Weapon list is empty")]
    NoWeapons,

    #[error("Weapon '{0}' has a burst count of zero")]
    ZeroBurstCount(String),

    #[error("Weapon '{0}' is ranged but has no ammunition pool")]
    MissingAmmo(String),

    #[error("Maximum health must be positive, got {0}")]
    InvalidMaxHealth(i32),

    #[error("Invalid projectile parameters: {0}")]
    InvalidProjectile(String),
}

pub type Result<T> = std::result::Result<T, CombatError>;
