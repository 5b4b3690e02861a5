use serde::{Deserialize, Serialize};
use tessera_grid::GridError;

/// Manager configuration. Every field falls back to its default when
/// absent from the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Edge length of a grid cell in world units.
    pub cell_size: f32,
    pub world_width: f32,
    pub world_height: f32,
    /// Half-extent of the collision window around the primary entity.
    pub collision_radius: f32,
    /// Number of update-time samples kept for the rolling average.
    pub timer_window: usize,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            cell_size: 64.0,
            world_width: 1600.0,
            world_height: 1600.0,
            collision_radius: 100.0,
            timer_window: 60,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("collision radius must be finite and non-negative, got {0}")]
    InvalidRadius(f32),

    #[error("timer window must hold at least one sample")]
    EmptyTimerWindow,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl SpatialConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Same config with a different world extent.
    pub fn with_world(mut self, width: f32, height: f32) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    /// Check the fields the manager cannot work around. Grid extents are
    /// checked by the grid itself when it is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.collision_radius.is_finite() || self.collision_radius < 0.0 {
            return Err(ConfigError::InvalidRadius(self.collision_radius));
        }
        if self.timer_window == 0 {
            return Err(ConfigError::EmptyTimerWindow);
        }
        Ok(())
    }
}
