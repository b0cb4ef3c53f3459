//! Launch configuration
//!
//! Decides which world config, settings file and run length the binary
//! uses.
//!
//! # Sources (in priority order)
//!
//! 1. First command line argument: path to a world config TOML
//! 2. Environment: `HEIST_CONFIG`, `HEIST_SETTINGS`, `HEIST_SECONDS`, `HEIST_FPS`
//! 3. Built-in defaults

use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_SETTINGS: &str = "settings.json";
const DEFAULT_SECONDS: f32 = 20.0;
const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum LaunchError {
    #[error("{name} must be a positive number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchConfig {
    /// World config TOML; built-in defaults when absent
    pub world_config: Option<PathBuf>,
    pub settings: PathBuf,
    /// Simulated seconds to run
    pub seconds: f32,
    pub fps: u32,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            world_config: None,
            settings: PathBuf::from(DEFAULT_SETTINGS),
            seconds: DEFAULT_SECONDS,
            fps: DEFAULT_FPS,
        }
    }
}

fn parse_positive<T>(name: &'static str, value: String) -> Result<T, LaunchError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(LaunchError::InvalidNumber { name, value }),
    }
}

impl LaunchConfig {
    /// Read the process arguments and environment
    pub fn load() -> Result<Self, LaunchError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    pub fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self, LaunchError> {
        let mut config = Self::default();

        config.world_config = args
            .first()
            .cloned()
            .or_else(|| env("HEIST_CONFIG"))
            .map(PathBuf::from);
        if let Some(settings) = env("HEIST_SETTINGS") {
            config.settings = PathBuf::from(settings);
        }
        if let Some(seconds) = env("HEIST_SECONDS") {
            config.seconds = parse_positive("HEIST_SECONDS", seconds)?;
        }
        if let Some(fps) = env("HEIST_FPS") {
            config.fps = parse_positive("HEIST_FPS", fps)?;
        }
        Ok(config)
    }

    /// Frame length in seconds
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    pub fn frame_count(&self) -> u64 {
        (self.seconds * self.fps as f32).ceil() as u64
    }

    pub fn print_summary(&self) {
        log::info!("Launch configuration:");
        match &self.world_config {
            Some(path) => log::info!("  World config: {}", path.display()),
            None => log::info!("  World config: built-in defaults"),
        }
        log::info!("  Settings: {}", self.settings.display());
        log::info!("  Run: {:.1}s at {} fps ({} frames)", self.seconds, self.fps, self.frame_count());
    }
}
