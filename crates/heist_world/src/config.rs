//! World configuration
//!
//! Every tunable of the simulation lives in one TOML document. Missing
//! sections and fields fall back to their defaults.
//!
//! # Example Config File
//!
//! ```toml
//! seed = 7
//!
//! [simulation]
//! timestep = 0.02
//! max_substeps = 8
//!
//! [player]
//! max_health = 100
//! move_speed = 5.0
//!
//! [vehicle]
//! max_speed = 20.0
//! wall_damage_factor = 20.0
//!
//! [coupling]
//! exit_distance = 1.5
//! exit_angle = 90.0
//!
//! [[weapons]]
//! name = "Knife"
//! kind = "melee"
//! melee_damage = 20
//!
//! [[missions]]
//! objective = "Kill all targets"
//! required_kills = 5
//! time_limit = 120.0
//! zone = { min = { x = -7.0, y = -7.0 }, max = { x = -5.0, y = -5.0 } }
//! ```

use crate::error::ConfigError;
use heist_ai::SpawnConfig;
use heist_combat::WeaponDef;
use heist_gamestate::MissionDef;
use heist_math::{Aabb2, Vec2};
use heist_physics::PhysicsConfig;
use heist_vehicle::VehicleConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_seed() -> u64 {
    0x5eed
}

fn default_weapons() -> Vec<WeaponDef> {
    WeaponDef::default_loadout()
}

fn default_missions() -> Vec<MissionSetup> {
    vec![MissionSetup::default()]
}

/// The controllable actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: i32,
    /// Units per second on foot
    pub move_speed: f32,
    pub footprint: Vec2,
    /// Distance from the actor to its attack point and muzzle
    pub attack_offset: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            move_speed: 5.0,
            footprint: Vec2::new(0.5, 0.5),
            attack_offset: 0.5,
        }
    }
}

/// Hostile actors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    pub max_health: i32,
    /// Hit points per second drained while a vehicle keeps touching the NPC
    pub continuous_damage: f32,
    /// Seconds the ground marker takes to fade out
    pub marker_fade: f32,
    /// Seconds a blood splash stays up
    pub splash_lifetime: f32,
    pub move_speed: f32,
    pub arrival_threshold: f32,
    pub footprint: Vec2,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            continuous_damage: 10.0,
            marker_fade: 120.0,
            splash_lifetime: 1.0,
            move_speed: 2.0,
            arrival_threshold: 0.5,
            footprint: Vec2::new(0.5, 0.5),
        }
    }
}

/// Where an actor lands when leaving a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingConfig {
    pub exit_distance: f32,
    /// Degrees, relative to the vehicle's rotation
    pub exit_angle: f32,
    /// Damage dealt to an occupant thrown out of a destroyed vehicle
    pub ejection_damage: i32,
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            exit_distance: 1.5,
            exit_angle: 90.0,
            ejection_damage: 20,
        }
    }
}

/// A mission and the zone that starts it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSetup {
    #[serde(flatten)]
    pub def: MissionDef,
    /// Without a zone the mission is disabled
    #[serde(default)]
    pub zone: Option<Aabb2>,
}

impl Default for MissionSetup {
    fn default() -> Self {
        Self {
            def: MissionDef::default(),
            zone: Some(Aabb2::from_center_size(Vec2::new(-6.0, -6.0), Vec2::new(2.0, 2.0))),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Seed for spawn placement, waypoint picks and effect rotation
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub simulation: PhysicsConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub npc: NpcConfig,
    #[serde(default)]
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub coupling: CouplingConfig,
    /// Ordered weapon slots; the first starts equipped
    #[serde(default = "default_weapons")]
    pub weapons: Vec<WeaponDef>,
    #[serde(default = "default_missions")]
    pub missions: Vec<MissionSetup>,
    #[serde(default)]
    pub spawn: SpawnConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            simulation: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            npc: NpcConfig::default(),
            vehicle: VehicleConfig::default(),
            coupling: CouplingConfig::default(),
            weapons: default_weapons(),
            missions: default_missions(),
            spawn: SpawnConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_simulation(mut self, simulation: PhysicsConfig) -> Self {
        self.simulation = simulation;
        self
    }

    pub fn with_weapons(mut self, weapons: Vec<WeaponDef>) -> Self {
        self.weapons = weapons;
        self
    }

    pub fn with_missions(mut self, missions: Vec<MissionSetup>) -> Self {
        self.missions = missions;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.weapons.is_empty() {
            return Err(ConfigError::Validation("at least one weapon slot is required".into()));
        }
        for weapon in &self.weapons {
            weapon
                .validate()
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
        }

        for (name, hp) in [
            ("player", self.player.max_health),
            ("npc", self.npc.max_health),
            ("vehicle", self.vehicle.max_health),
        ] {
            if hp <= 0 {
                return Err(ConfigError::Validation(format!("{name} max_health must be positive, got {hp}")));
            }
        }

        if self.coupling.exit_distance < 0.0 || self.coupling.ejection_damage < 0 {
            return Err(ConfigError::Validation("coupling distances and damage must not be negative".into()));
        }
        if self.npc.marker_fade <= 0.0 || self.npc.splash_lifetime < 0.0 {
            return Err(ConfigError::Validation("npc effect durations must be positive".into()));
        }
        for setup in &self.missions {
            let limit = setup.def.time_limit;
            if !(limit > 0.0) || !limit.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "mission '{}' time_limit must be positive, got {limit}",
                    setup.def.objective
                )));
            }
        }
        if !self.spawn.area.is_valid() {
            return Err(ConfigError::Validation(format!("spawn area {:?} is inverted", self.spawn.area)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heist_combat::WeaponKind;

    #[test]
    fn test_defaults_validate() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weapons.len(), 3);
        assert_eq!(config.missions.len(), 1);
        assert_eq!(config.coupling.ejection_damage, 20);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(config.seed, 0x5eed);
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.npc.marker_fade, 120.0);
    }

    #[test]
    fn test_partial_sections() {
        let config = WorldConfig::from_toml_str(
            r#"
            seed = 42

            [player]
            move_speed = 7.5

            [coupling]
            exit_angle = -90.0

            [[weapons]]
            name = "Bat"
            kind = "melee"
            melee_damage = 35

            [[missions]]
            objective = "Clear the block"
            required_kills = 2
            time_limit = 10.0
            zone = { min = { x = 0.0, y = 0.0 }, max = { x = 2.0, y = 2.0 } }
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.player.move_speed, 7.5);
        assert_eq!(config.player.max_health, 100);
        assert_eq!(config.coupling.exit_angle, -90.0);
        assert_eq!(config.coupling.exit_distance, 1.5);
        assert_eq!(config.weapons.len(), 1);
        assert_eq!(config.weapons[0].kind, WeaponKind::Melee);
        assert_eq!(config.weapons[0].melee_damage, 35);
        assert_eq!(config.missions[0].def.required_kills, 2);
        assert_eq!(config.missions[0].def.reward_currency, 50);
        assert!(config.missions[0].zone.is_some());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            WorldConfig::from_toml_str("[simulation]\ntimestep = 0.0\n"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("[npc]\nmax_health = 0\n"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            WorldConfig::default().with_weapons(Vec::new()).validate(),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("[[missions]]\ntime_limit = 0.0\n"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(WorldConfig::from_toml_str("seed = ["), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("heist_world_missing_config.toml");
        assert!(matches!(WorldConfig::load(&path), Err(ConfigError::Io(_))));
    }
}
