//! Simulation configuration resource.
//!
//! Settings loaded from an INI configuration file. Defaults describe a
//! 1024x768 playfield with a 50 unit margin, updated 60 times per second.
//!
//! # Configuration File Format
//!
//! ```ini
//! [world]
//! left = -50
//! top = -50
//! right = 1074
//! bottom = 818
//!
//! [simulation]
//! updates_per_second = 60
//! time_scale = 1.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::geometry::{BoundingBox, Vector2};

/// Default safe values for startup
const DEFAULT_WORLD_LEFT: f32 = -50.0;
const DEFAULT_WORLD_TOP: f32 = -50.0;
const DEFAULT_WORLD_RIGHT: f32 = 1024.0 + 50.0;
const DEFAULT_WORLD_BOTTOM: f32 = 768.0 + 50.0;
const DEFAULT_UPDATES_PER_SECOND: u32 = 60;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./danmaku.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// World box consulted by the off-screen destroy policy.
    pub world: BoundingBox,
    /// Fixed update rate used by the demo driver.
    pub updates_per_second: u32,
    /// Multiplier applied to every `dt` before systems see it.
    pub time_scale: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            world: BoundingBox::new(
                Vector2::new(DEFAULT_WORLD_LEFT, DEFAULT_WORLD_TOP),
                Vector2::new(DEFAULT_WORLD_RIGHT, DEFAULT_WORLD_BOTTOM),
            ),
            updates_per_second: DEFAULT_UPDATES_PER_SECOND,
            time_scale: DEFAULT_TIME_SCALE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Seconds per fixed update.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.updates_per_second.max(1) as f32
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| {
            config
                .getfloat(section, key)
                .ok()
                .flatten()
                .map(|v| v as f32)
        };

        // [world] section
        let mut min = self.world.min;
        let mut max = self.world.max;
        if let Some(left) = float("world", "left") {
            min.x = left;
        }
        if let Some(top) = float("world", "top") {
            min.y = top;
        }
        if let Some(right) = float("world", "right") {
            max.x = right;
        }
        if let Some(bottom) = float("world", "bottom") {
            max.y = bottom;
        }
        self.world = BoundingBox::new(min, max);

        // [simulation] section
        if let Some(ups) = config
            .getuint("simulation", "updates_per_second")
            .ok()
            .flatten()
        {
            self.updates_per_second = (ups as u32).max(1);
        }
        if let Some(scale) = float("simulation", "time_scale") {
            self.time_scale = scale.max(0.0);
        }

        info!(
            "Loaded config: world ({}, {})-({}, {}), {} updates/s, time_scale={}",
            self.world.min.x,
            self.world.min.y,
            self.world.max.x,
            self.world.max.y,
            self.updates_per_second,
            self.time_scale
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [world] section
        config.set("world", "left", Some(self.world.min.x.to_string()));
        config.set("world", "top", Some(self.world.min.y.to_string()));
        config.set("world", "right", Some(self.world.max.x.to_string()));
        config.set("world", "bottom", Some(self.world.max.y.to_string()));

        // [simulation] section
        config.set(
            "simulation",
            "updates_per_second",
            Some(self.updates_per_second.to_string()),
        );
        config.set("simulation", "time_scale", Some(self.time_scale.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
