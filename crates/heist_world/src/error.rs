//! World errors

use heist_core::EntityId;
use thiserror::Error;

/// Rejected enter/exit requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouplingError {
    #[error("actor {0} is already in a vehicle")]
    AlreadyInVehicle(EntityId),

    #[error("actor {0} is not in a vehicle")]
    NotInVehicle(EntityId),

    #[error("actor {actor} is not in vehicle {vehicle}")]
    WrongVehicle { actor: EntityId, vehicle: EntityId },

    #[error("actor {actor} is out of reach of vehicle {vehicle}")]
    OutOfReach { actor: EntityId, vehicle: EntityId },

    #[error("vehicle {0} is occupied")]
    VehicleOccupied(EntityId),

    #[error("vehicle {0} is destroyed")]
    VehicleDestroyed(EntityId),

    #[error("actor {0} is destroyed")]
    ActorDestroyed(EntityId),

    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),
}

/// Failures loading or validating a [`crate::WorldConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Failures building the world
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("combat setup failed: {0}")]
    Combat(#[from] heist_combat::CombatError),

    #[error("physics setup failed: {0}")]
    Physics(#[from] heist_physics::PhysicsError),

    #[error("a player already exists: {0}")]
    PlayerExists(EntityId),
}

pub type Result<T> = std::result::Result<T, WorldError>;
