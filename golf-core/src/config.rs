//! Game configuration loader.
//!
//! Loads physics and turn settings plus course definitions from YAML files,
//! so courses and tuning can change without recompiling. Every setting has a
//! default, so the simulation also runs without any files.
//!
//! ## Directory Structure
//!
//! ```text
//! config/
//! ├── default.yaml
//! ├── low_gravity.yaml
//! └── courses/
//!     ├── walled_green.yaml
//!     └── practice_ramp.yaml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collision::{CollisionConfig, RollingPolicy};
use crate::game::course::CourseDef;
use crate::types::constants;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    NotFound(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "YAML parse error: {}", e),
            ConfigError::NotFound(name) => write!(f, "Config not found: {}", name),
            ConfigError::Invalid(reason) => write!(f, "Invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err)
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Physics tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Multiplier on the nominal 1/60 s tick
    pub time_scale: f64,
    /// Gravity direction in degrees; 0 is straight down, positive tilts
    /// towards +x
    pub gravity_direction_deg: f64,
    pub gravitational_constant: f64,
    /// Planet mass in kg
    pub planet_mass: f64,
    /// Planet radius in course units
    pub planet_radius: f64,
    /// Gravity used for rolling friction
    pub friction_gravity: f64,
    /// Normal damping for the implicit floor plane
    pub floor_bounce: f64,
    /// `always`, or `below_speed: { speed_squared: .. }`
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub rolling: RollingPolicy,
    /// Sandbox balls farther than this from the origin are removed
    pub cull_distance: Option<f64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            gravity_direction_deg: 0.0,
            gravitational_constant: 6.67408e-11,
            planet_mass: 5.972e24,
            planet_radius: 6.371e6,
            friction_gravity: 9.81,
            floor_bounce: 0.8,
            rolling: RollingPolicy::Always,
            cull_distance: None,
        }
    }
}

impl PhysicsConfig {
    pub fn collision_config(&self) -> CollisionConfig {
        CollisionConfig {
            rolling: self.rolling,
            friction_gravity: self.friction_gravity,
            friction_dt: constants::FRICTION_DT,
        }
    }
}

/// Where shots come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Every shot uses the hole's default impulse, fired as soon as the
    /// player is aiming
    Auto,
    /// The game waits in AIMING until a shot is supplied
    Interactive,
}

/// Turn state machine tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    /// Per-tick displacement below which the ball counts as still
    pub stall_distance: f64,
    /// Still ticks after which the ball counts as stopped
    pub stall_ticks: u32,
    /// Balls below this height are out of bounds
    pub out_of_bounds_y: f64,
    pub input: InputMode,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            stall_distance: 0.01,
            stall_ticks: 120,
            out_of_bounds_y: -10.0,
            input: InputMode::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub turn: TurnConfig,
}

impl GameConfig {
    /// Reject settings that would break the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if !(p.time_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "time_scale must be positive, got {}",
                p.time_scale
            )));
        }
        if !(p.planet_radius > 0.0) || !(p.planet_mass > 0.0) {
            return Err(ConfigError::Invalid(
                "planet mass and radius must be positive".to_string(),
            ));
        }
        if p.friction_gravity < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "friction_gravity must not be negative, got {}",
                p.friction_gravity
            )));
        }
        if let Some(d) = p.cull_distance {
            if !(d > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "cull_distance must be positive, got {}",
                    d
                )));
            }
        }
        if self.turn.stall_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "stall_distance must not be negative, got {}",
                self.turn.stall_distance
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Config loader with configurable base directory.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// The base path holds game settings files and a `courses/` directory.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load and validate game settings by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = ConfigLoader::new("config");
    /// let config = loader.load_game_config("default")?;
    /// ```
    pub fn load_game_config(&self, name: &str) -> Result<GameConfig, ConfigError> {
        let config: GameConfig = self.load_yaml(&self.base_path, name)?;
        if let Err(e) = config.validate() {
            log::warn!("Rejecting game config {}: {}", name, e);
            return Err(e);
        }
        Ok(config)
    }

    /// Load a course definition by name.
    pub fn load_course(&self, name: &str) -> Result<CourseDef, ConfigError> {
        let course: CourseDef = self.load_yaml(&self.base_path.join("courses"), name)?;
        if let Err(e) = course.validate() {
            log::warn!("Rejecting course {}: {}", name, e);
            return Err(e);
        }
        Ok(course)
    }

    /// List available courses, sorted by name.
    pub fn list_courses(&self) -> Result<Vec<String>, ConfigError> {
        let path = self.base_path.join("courses");
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn load_yaml<T: serde::de::DeserializeOwned>(
        &self,
        dir: &Path,
        name: &str,
    ) -> Result<T, ConfigError> {
        let path = dir.join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
