//! # heist_gamestate - Missions and Progression
//!
//! Provides:
//! - Timed kill-count missions with success and failure outcomes
//! - The reward sink missions pay into, plus an in-memory wallet
//! - The master volume setting and its JSON store

pub mod error;
pub mod mission;
pub mod reward;
pub mod settings;

pub use error::{MissionError, SettingsError};
pub use mission::{MarkerState, MissionController, MissionDef, MissionEvent, MissionId, MissionState};
pub use reward::{RewardSink, Wallet};
pub use settings::{Settings, SettingsStore};

pub mod prelude {
    pub use crate::error::{MissionError, SettingsError};
    pub use crate::mission::{MarkerState, MissionController, MissionDef, MissionEvent, MissionId, MissionState};
    pub use crate::reward::{RewardSink, Wallet};
    pub use crate::settings::{Settings, SettingsStore};
}
