//! Physics configuration

use crate::error::{PhysicsError, Result};
use heist_core::FixedStepper;
use serde::{Deserialize, Serialize};

/// Fixed-step settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Fixed timestep for contact and motion resolution
    #[serde(default = "default_timestep")]
    pub timestep: f32,

    /// Maximum number of substeps per frame
    #[serde(default = "default_max_substeps")]
    pub max_substeps: u32,
}

fn default_timestep() -> f32 {
    1.0 / 50.0
}

fn default_max_substeps() -> u32 {
    8
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: default_timestep(),
            max_substeps: default_max_substeps(),
        }
    }
}

impl PhysicsConfig {
    /// Set the timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the substep cap
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.timestep > 0.0) || self.timestep > 1.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "timestep must be in (0, 1], got {}",
                self.timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig("max_substeps must be at least 1".into()));
        }
        Ok(())
    }

    /// Build the accumulator that drives fixed substeps
    pub fn stepper(&self) -> Result<FixedStepper> {
        self.validate()?;
        Ok(FixedStepper::new(self.timestep, self.max_substeps)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PhysicsConfig::default();
        assert_eq!(config.max_substeps, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid() {
        assert!(PhysicsConfig::default().with_timestep(0.0).validate().is_err());
        assert!(PhysicsConfig::default().with_max_substeps(0).stepper().is_err());
    }
}
