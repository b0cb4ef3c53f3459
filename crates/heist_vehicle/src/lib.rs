//! # heist_vehicle - Vehicle Control
//!
//! A vehicle is either `Idle` (unoccupied, wide footprint, ignores input) or
//! `Driving` (occupied, narrow footprint, integrates throttle and steering).
//! Throttle is integrated once per frame; position and rotation once per
//! fixed step. Contacts while driving turn into wall impacts, NPC impacts or
//! soft blocks.

pub mod config;
pub mod vehicle;

pub use config::VehicleConfig;
pub use vehicle::{CollisionResponse, Vehicle, VehicleState};

pub mod prelude {
    pub use crate::config::VehicleConfig;
    pub use crate::vehicle::{CollisionResponse, Vehicle, VehicleState};
}
