//! Viewer configuration
//!
//! Read from a RON file. Every field has a default, so the file may list
//! only what it changes, and a missing file means "all defaults".

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::input::InputSettings;
use crate::orbit::OrbitSettings;
use crate::rasterizer::{Color, RasterSettings};

/// Default location of the configuration file
pub const CONFIG_PATH: &str = "assets/viewer.ron";

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_title: String,
    pub window_width: i32,
    pub window_height: i32,

    /// Room list to display
    pub rooms_path: PathBuf,
    /// Directory of `<code>.png` tiles
    pub tiles_dir: PathBuf,

    /// Edge length of one room cube in world units
    pub room_size: f32,
    /// Pixel size of one atlas cell
    pub face_size: u32,

    /// Software framebuffer resolution (scaled to the window)
    pub render_width: usize,
    pub render_height: usize,
    /// Vertical field of view, degrees
    pub fov_deg: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub background: Color,

    pub orbit: OrbitSettings,
    pub input: InputSettings,
    pub raster: RasterSettings,

    /// Room count and camera angle overlay
    pub show_hud: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Castle Map".to_string(),
            window_width: 1000,
            window_height: 800,
            rooms_path: PathBuf::from("assets/rooms.txt"),
            tiles_dir: PathBuf::from("assets/tiles"),
            room_size: 5.5,
            face_size: 16,
            render_width: 500,
            render_height: 400,
            fov_deg: 30.0,
            near_clip: 50.0,
            far_clip: 1000.0,
            background: Color::LIGHT_BLUE,
            orbit: OrbitSettings::default(),
            input: InputSettings::default(),
            raster: RasterSettings::default(),
            show_hud: true,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a configuration from a RON string
    pub fn from_ron_str(s: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: ViewerConfig = ron::from_str(s).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents, path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        let max_side = u16::MAX as usize;

        if !positive(self.room_size) {
            return Err(ConfigError::Invalid("room_size must be a positive number".to_string()));
        }
        if self.face_size == 0 {
            return Err(ConfigError::Invalid("face_size must be positive".to_string()));
        }
        if self.render_width == 0 || self.render_height == 0 {
            return Err(ConfigError::Invalid("render size must be positive".to_string()));
        }
        if self.render_width > max_side || self.render_height > max_side {
            return Err(ConfigError::Invalid(format!("render size must be at most {}", max_side)));
        }
        if !(positive(self.fov_deg) && self.fov_deg < 180.0) {
            return Err(ConfigError::Invalid("fov_deg must be between 0 and 180".to_string()));
        }
        if !(positive(self.near_clip) && self.far_clip.is_finite() && self.near_clip < self.far_clip) {
            return Err(ConfigError::Invalid("need 0 < near_clip < far_clip".to_string()));
        }
        let orbit = &self.orbit;
        if !(orbit.radius.is_finite() && orbit.radius > 0.0) {
            return Err(ConfigError::Invalid("orbit radius must be a positive number".to_string()));
        }
        let orbit_values = [
            orbit.center_x,
            orbit.center_z,
            orbit.height,
            orbit.step,
            orbit.coarse_factor,
            orbit.start_angle_deg,
        ];
        if orbit_values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("orbit settings must be finite numbers".to_string()));
        }
        Ok(())
    }
}
