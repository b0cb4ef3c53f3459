//! # heist_world - Simulation World
//!
//! Ties the engine crates into one playable simulation:
//! - Players and NPCs with health, weapons and patrols (`actor`)
//! - Entering, leaving and being thrown out of vehicles (`coupling`)
//! - Blood splashes, fading ground markers and wrecks (`effects`)
//! - Input sampling and scripted playback (`input`)
//! - TOML world configuration (`config`)
//! - The dual-rate step driving all of it (`world`)
//!
//! ## Example
//!
//! ```ignore
//! use heist_world::prelude::*;
//!
//! let mut world = World::new(WorldConfig::default(), Arc::new(NullPresenter), Arc::new(Wallet::new()))?;
//! world.spawn_player(Vec2::ZERO)?;
//! world.populate_npcs();
//!
//! let input = InputFrame::idle().with_axes(0.0, 1.0);
//! world.step(1.0 / 60.0, &input);
//! ```

pub mod actor;
pub mod config;
pub mod coupling;
pub mod effects;
pub mod error;
pub mod events;
pub mod input;
pub mod world;

pub use actor::{Actor, ActorKind, ActorMode};
pub use config::{CouplingConfig, MissionSetup, NpcConfig, PlayerConfig, WorldConfig};
pub use coupling::Ejection;
pub use effects::Effects;
pub use error::{ConfigError, CouplingError, Result, WorldError};
pub use events::WorldEvent;
pub use input::{Action, Axis, InputFrame, InputSource, ScriptedInput};
pub use world::World;

pub mod prelude {
    pub use crate::actor::{Actor, ActorKind, ActorMode};
    pub use crate::config::{CouplingConfig, MissionSetup, NpcConfig, PlayerConfig, WorldConfig};
    pub use crate::coupling::Ejection;
    pub use crate::effects::Effects;
    pub use crate::error::{ConfigError, CouplingError, Result, WorldError};
    pub use crate::events::WorldEvent;
    pub use crate::input::{Action, Axis, InputFrame, InputSource, ScriptedInput};
    pub use crate::world::World;
}
