//! Vehicle tuning

use heist_math::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Speed gained per second at full throttle
    pub acceleration: f32,
    /// Speed lost per second with no throttle
    pub deceleration: f32,
    pub max_speed: f32,
    /// Degrees per second at full steering
    pub turn_rate: f32,
    /// Angle between the body's local `+x` and its driving direction, in degrees
    pub forward_offset: f32,
    /// Footprint while occupied
    pub driving_footprint: Vec2,
    /// Footprint while parked, wide enough to walk into
    pub idle_footprint: Vec2,
    pub max_health: i32,
    /// Wall impact damage to the vehicle per unit of speed
    pub wall_damage_factor: f32,
    /// Wall impact damage to the occupant per unit of speed
    pub occupant_damage_factor: f32,
    /// Impact damage to an NPC per unit of speed
    pub npc_impact_factor: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            acceleration: 10.0,
            deceleration: 5.0,
            max_speed: 20.0,
            turn_rate: 100.0,
            forward_offset: 90.0,
            driving_footprint: Vec2::new(1.5, 1.0),
            idle_footprint: Vec2::new(2.0, 1.0),
            max_health: 100,
            wall_damage_factor: 20.0,
            occupant_damage_factor: 5.0,
            npc_impact_factor: 50.0,
        }
    }
}

impl VehicleConfig {
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_max_health(mut self, max_health: i32) -> Self {
        self.max_health = max_health;
        self
    }
}
