//! Mission and settings errors

use thiserror::Error;

/// Why a mission refused to start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissionError {
    #[error("Mission is already active")]
    AlreadyActive,
    #[error("Mission was already completed")]
    AlreadySucceeded,
    #[error("Mission has no activation zone")]
    NoActivationZone,
    #[error("Actor is not inside the activation zone")]
    NotInZone,
}

/// Settings store errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
